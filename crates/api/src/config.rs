//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use orchestrator::MatchConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// Matching engine settings (database, recommendation thresholds).
    pub matching: MatchConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `127.0.0.1:8790` |
    ///
    /// plus everything [`MatchConfig::from_env`] reads.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let matching = MatchConfig::from_env()?;

        Ok(Self { addr, matching })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,

    #[error(transparent)]
    Matching(#[from] orchestrator::ConfigError),
}
