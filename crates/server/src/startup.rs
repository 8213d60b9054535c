use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, table};
use crate::sandbox::build_sandbox_router;
use crate::state::AppState;
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn parse_addr(cfg: &ServerConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Check the named-route table and log it.
fn log_routes() -> Result<(), StartupError> {
    table::validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    for r in table::ROUTES {
        info!(name = r.name.as_str(), method = r.method.as_str(), path = r.path, "route");
    }
    Ok(())
}

/// Public entry: build the directory app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let users_file = cfg.storage.users_file.clone();
    runtime::ensure_env(&users_file)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let state = AppState::from_file(&users_file).await?;
    log_routes()?;

    let app: Router = routes::build_router(state, build_cors());

    let addr = parse_addr(&cfg.server)?;
    info!(%addr, users_file = %users_file, "starting user directory");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run the routing sandbox on its own address.
pub async fn run_sandbox(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = parse_addr(&cfg.sandbox)?;
    info!(%addr, "starting routing sandbox");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_sandbox_router()).await?;
    Ok(())
}
