//! Gateway configuration, read once at startup.

use customer_core::{ClientConfig, ConfigError};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum GatewayConfigError {
    #[error("APP_PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error(transparent)]
    Client(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub client: ClientConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            client: ClientConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// `APP_HOST`, `APP_PORT`, plus the upstream settings read by
    /// `ClientConfig::from_env`.
    pub fn from_env() -> Result<Self, GatewayConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| GatewayConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };
        let client = ClientConfig::from_lookup(&lookup)?;
        Ok(Self { host, port, client })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
