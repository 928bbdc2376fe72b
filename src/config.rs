//! Configuration Module
//!
//! Handles loading and validating cache configuration.

use std::env;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Every field must be positive; `validate` rejects a zero
/// anywhere before a cache is built from it.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Number of independently locked shards
    pub shard_count: usize,
    /// Maximum number of entries each shard can hold
    pub per_shard_limit: usize,
    /// Default timeout in milliseconds for entries cached without an explicit timeout
    pub default_timeout_ms: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHARD_COUNT` - Number of shards (default: 8)
    /// - `PER_SHARD_LIMIT` - Maximum entries per shard (default: 128)
    /// - `DEFAULT_TIMEOUT_MS` - Default entry timeout in milliseconds (default: 300000)
    pub fn from_env() -> Self {
        Self {
            shard_count: env::var("SHARD_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            per_shard_limit: env::var("PER_SHARD_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(128),
            default_timeout_ms: env::var("DEFAULT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
        }
    }

    /// Checks that every parameter is a positive integer.
    ///
    /// Violation is a fatal configuration error: construction fails and
    /// no partially-initialized cache is returned.
    pub fn validate(&self) -> Result<()> {
        if self.shard_count == 0 {
            return Err(ConfigError::ShardCount(self.shard_count));
        }
        if self.per_shard_limit == 0 {
            return Err(ConfigError::PerShardLimit(self.per_shard_limit));
        }
        if self.default_timeout_ms == 0 {
            return Err(ConfigError::DefaultTimeout(self.default_timeout_ms));
        }
        Ok(())
    }

    /// Returns the default entry timeout as a `Duration`.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            shard_count: 8,
            per_shard_limit: 128,
            default_timeout_ms: 300_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.shard_count, 8);
        assert_eq!(config.per_shard_limit, 128);
        assert_eq!(config.default_timeout_ms, 300_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SHARD_COUNT");
        env::remove_var("PER_SHARD_LIMIT");
        env::remove_var("DEFAULT_TIMEOUT_MS");

        let config = CacheConfig::from_env();
        assert_eq!(config.shard_count, 8);
        assert_eq!(config.per_shard_limit, 128);
        assert_eq!(config.default_timeout_ms, 300_000);
    }

    #[test]
    fn test_config_rejects_zero_shard_count() {
        let config = CacheConfig {
            shard_count: 0,
            ..CacheConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ShardCount(0)));
    }

    #[test]
    fn test_config_rejects_zero_per_shard_limit() {
        let config = CacheConfig {
            per_shard_limit: 0,
            ..CacheConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PerShardLimit(0)));
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let config = CacheConfig {
            default_timeout_ms: 0,
            ..CacheConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DefaultTimeout(0)));
    }

    #[test]
    fn test_config_default_timeout_duration() {
        let config = CacheConfig {
            default_timeout_ms: 1500,
            ..CacheConfig::default()
        };
        assert_eq!(config.default_timeout(), Duration::from_millis(1500));
    }
}
