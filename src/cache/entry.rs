//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A single cache entry: the stored value plus the metadata needed to
/// expire it safely.
///
/// The `stamp` is an identity marker drawn from a per-cache counter at
/// every insert. A later insert under the same key produces a new entry
/// with a new stamp, which is how an expiration ticket issued for the
/// old entry can recognize at fire time that it no longer applies.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The stored value
    pub value: V,
    /// Identity stamp distinguishing this entry from any other entry
    /// that ever occupied the same key
    pub stamp: u64,
    /// Absolute deadline after which the entry is expired
    pub expires_at: Instant,
}

impl<V> Entry<V> {
    /// Creates a new cache entry.
    pub fn new(value: V, stamp: u64, expires_at: Instant) -> Self {
        Self {
            value,
            stamp,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to its deadline, so once the timeout has
    /// fully elapsed the entry is immediately expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or zero if already expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
