//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Default bind address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// API server configuration.
///
/// Provider settings live in [`openai_provider::OpenAiConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `INTAKE_API_ADDR` | Server bind address | `127.0.0.1:3000` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("INTAKE_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = raw
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw.clone()))?;

        Ok(Self { addr })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid INTAKE_API_ADDR: {0}")]
    InvalidAddr(String),
}
