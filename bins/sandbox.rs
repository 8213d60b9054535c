use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "sandbox", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    tokio::select! {
        res = server::run_sandbox(cfg) => match res {
            Ok(()) => std::process::ExitCode::SUCCESS,
            Err(e) => {
                error!(service = "sandbox", event = "run_failed", error = %e, "sandbox stopped with error");
                std::process::ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!(service = "sandbox", event = "shutdown_signal", "received Ctrl+C, shutting down");
            std::process::ExitCode::SUCCESS
        }
    }
}
