use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_USERS_FILE: &str = "data/users_data.json";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "default_sandbox")]
    pub sandbox: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { server: ServerConfig::default(), storage: StorageConfig::default(), sandbox: default_sandbox() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_users_file")]
    pub users_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { users_file: default_users_file() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_users_file() -> String { DEFAULT_USERS_FILE.into() }
fn default_sandbox() -> ServerConfig {
    ServerConfig { host: default_host(), port: 8082, worker_threads: Some(1) }
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content).map_err(|e| anyhow!("{path}: {e}"))?;
    Ok(cfg)
}

/// `Ok(None)` only when `path` does not exist; unreadable or malformed files are errors.
fn load_if_present(path: &str) -> Result<Option<AppConfig>> {
    match load_from_file(path) {
        Ok(cfg) => Ok(Some(cfg)),
        Err(e) => match e.downcast_ref::<std::io::Error>() {
            Some(io) if io.kind() == std::io::ErrorKind::NotFound => Ok(None),
            _ => Err(e),
        },
    }
}

impl AppConfig {
    /// Load `config.toml` when present, otherwise build the config from env vars.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = load_if_present(path)?.unwrap_or_else(Self::from_env);
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults overlaid with `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`,
    /// `SANDBOX_HOST` and `SANDBOX_PORT`.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(host) = std::env::var("SANDBOX_HOST") {
            cfg.sandbox.host = host;
        }
        if let Some(port) = std::env::var("SANDBOX_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.sandbox.port = port;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize("server")?;
        self.sandbox.normalize("sandbox")?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self, section: &str) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("{section}.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    /// `USERS_DATA_FILE` wins over the file value.
    pub fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("USERS_DATA_FILE") {
            if !path.trim().is_empty() {
                self.users_file = path;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.users_file.trim().is_empty() {
            return Err(anyhow!("storage.users_file is empty; set it in config.toml or USERS_DATA_FILE"));
        }
        Ok(())
    }
}
