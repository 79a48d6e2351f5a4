//! Configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

/// Matching engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// Connection pool size.
    pub pool_size: u32,
    /// Minimum match score for recommended connections.
    pub recommended_min_score: f64,
    /// Default number of recommended connections.
    pub recommended_limit: i64,
    /// Connections at most this many days old count as new.
    pub new_connection_days: i64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:hitme.db?mode=rwc".to_string(),
            pool_size: database::Database::DEFAULT_POOL_SIZE,
            recommended_min_score: 0.5,
            recommended_limit: 10,
            new_connection_days: 3,
        }
    }
}

impl MatchConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:hitme.db?mode=rwc` |
    /// | `SQLITE_POOL_SIZE` | Connection pool size | `20` |
    /// | `RECOMMENDED_MIN_SCORE` | Minimum score for recommendations | `0.5` |
    /// | `RECOMMENDED_LIMIT` | Default recommendation count | `10` |
    /// | `NEW_CONNECTION_DAYS` | Age threshold for "new" connections | `3` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = env::var("SQLITE_PATH").unwrap_or(defaults.database_url);
        let pool_size = parse_var("SQLITE_POOL_SIZE", defaults.pool_size)?;
        let recommended_min_score =
            parse_var("RECOMMENDED_MIN_SCORE", defaults.recommended_min_score)?;
        let recommended_limit = parse_var("RECOMMENDED_LIMIT", defaults.recommended_limit)?;
        let new_connection_days = parse_var("NEW_CONNECTION_DAYS", defaults.new_connection_days)?;

        if !(0.0..=1.0).contains(&recommended_min_score) {
            return Err(ConfigError::OutOfRange {
                var: "RECOMMENDED_MIN_SCORE",
                value: recommended_min_score.to_string(),
            });
        }
        if pool_size == 0 {
            return Err(ConfigError::OutOfRange {
                var: "SQLITE_POOL_SIZE",
                value: pool_size.to_string(),
            });
        }

        Ok(Self {
            database_url,
            pool_size,
            recommended_min_score,
            recommended_limit,
            new_connection_days,
        })
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("{var} is out of range: {value}")]
    OutOfRange { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.pool_size, 20);
        assert_eq!(config.recommended_min_score, 0.5);
        assert_eq!(config.recommended_limit, 10);
        assert_eq!(config.new_connection_days, 3);
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let value: u32 = parse_var("HITME_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }
}
