//! Environment-driven service configuration.

use crate::error::ConfigError;
use std::net::SocketAddr;

/// Runtime settings read from the environment. The binary loads a `.env`
/// file via dotenvy before calling `from_env`, so either source works.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
}

impl AppConfig {
    /// Read configuration from the environment. Missing values fall back to
    /// local-development defaults; malformed values are an error.
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/crm".into());

        let bind_raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let max_raw =
            std::env::var("DATABASE_MAX_CONNECTIONS").unwrap_or_else(|_| "5".into());
        let max_connections = max_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "DATABASE_MAX_CONNECTIONS",
            value: max_raw.clone(),
        })?;

        Ok(AppConfig {
            database_url,
            bind_addr,
            max_connections,
        })
    }
}
