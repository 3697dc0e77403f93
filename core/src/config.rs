//! Client configuration.
//!
//! The core never reads the environment on its own. Hosts build a
//! `ClientConfig` once at startup (usually with `from_env`) and hand it to
//! `Transport::new`.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },

    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

/// Where the upstream API lives and how long to wait for it.
///
/// `None` for a timeout means the call may block indefinitely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Read `API_BASE_URL`, `API_CONNECT_TIMEOUT_SECS` and
    /// `API_READ_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("API_BASE_URL") {
            let base_url = base_url.trim();
            if base_url.is_empty() {
                return Err(ConfigError::Empty { key: "API_BASE_URL" });
            }
            config.base_url = base_url.to_string();
        }
        if let Some(value) = lookup("API_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = parse_timeout("API_CONNECT_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("API_READ_TIMEOUT_SECS") {
            config.read_timeout = parse_timeout("API_READ_TIMEOUT_SECS", &value)?;
        }

        Ok(config)
    }
}

/// `0` disables the timeout.
fn parse_timeout(key: &'static str, value: &str) -> Result<Option<Duration>, ConfigError> {
    let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
        key,
        value: value.to_string(),
    })?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
