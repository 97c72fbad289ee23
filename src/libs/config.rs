use clap::Parser;
use reqwest::Url;
use std::net::SocketAddr;
use std::time::Duration;

/// REST backend for the admin panel.
#[derive(Debug, Clone, Parser)]
#[command(name = "crudpanel-server", version, about)]
pub struct ServerConfig {
    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection.
    #[arg(long, env = "ACQUIRE_TIMEOUT_SECS", default_value_t = 20)]
    pub acquire_timeout_secs: u64,
}

impl ServerConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn redacted_database_url(&self) -> String {
        redact_password(&self.database_url)
    }
}

const REDACTED: &str = "redacted";

/// The connection URL with its password replaced, fit to log or serve.
/// Anything that does not parse as a URL is hidden entirely.
pub fn redact_password(database_url: &str) -> String {
    let Ok(mut url) = Url::parse(database_url) else {
        return REDACTED.to_string();
    };
    if url.password().is_some() && url.set_password(Some(REDACTED)).is_err() {
        return REDACTED.to_string();
    }
    url.to_string()
}

/// Terminal admin panel.
#[derive(Debug, Clone, Parser)]
#[command(name = "crudpanel", version, about)]
pub struct PanelConfig {
    /// Base address of the REST backend.
    #[arg(long, env = "CRUDPANEL_API", default_value = "http://127.0.0.1:5000")]
    pub api: String,
}

/// Initialises `env_logger`, `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
