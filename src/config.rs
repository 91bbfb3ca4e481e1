//! Server configuration
//!
//! Defaults can be overridden with `PARKING_HOST`, `PARKING_PORT` and
//! `PARKING_LOG_LEVEL`.

use thiserror::Error;

pub const HOST_VAR: &str = "PARKING_HOST";
pub const PORT_VAR: &str = "PARKING_PORT";
pub const LOG_LEVEL_VAR: &str = "PARKING_LOG_LEVEL";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a port number, got {value:?}")]
    InvalidPort { var: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Server host, an IP literal or a name such as `localhost`
    pub host: String,
    /// Server port
    pub port: u16,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(HOST_VAR) {
            config.host = host;
        }
        if let Some(port) = lookup(PORT_VAR) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_VAR,
                value: port,
            })?;
        }
        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            config.log_level = level;
        }

        Ok(config)
    }

    /// `host:port`, resolved when the listener binds
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
