//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Config Error Enum ==
/// Fatal configuration errors raised at cache construction.
///
/// Absence of a key is never an error: `lookup`, `contains` and
/// `remove` report it through their return values instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Shard count was zero
    #[error("shard count must be a positive integer, got {0}")]
    ShardCount(usize),

    /// Per-shard entry limit was zero
    #[error("per-shard entry limit must be a positive integer, got {0}")]
    PerShardLimit(usize),

    /// Default timeout was zero
    #[error("default timeout must be a positive number of milliseconds, got {0}")]
    DefaultTimeout(u64),
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, ConfigError>;
