//! Shard Module
//!
//! A bounded key-value partition combining HashMap storage with LRU
//! tracking and conditional, stamp-checked removal.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::time::Instant;

use crate::cache::{CacheStats, Entry, LruTracker};

// == Shard ==
/// One independently locked partition of the cache's key space.
///
/// A shard never holds more than `limit` entries: a fresh insert at
/// capacity first displaces the shard-local least-recently-used entry.
/// Recency comparisons never cross shard boundaries.
///
/// The shard itself carries no lock; the cache facade wraps each shard
/// in its own mutex so operations on different shards run fully in
/// parallel.
#[derive(Debug)]
pub struct Shard<K, V> {
    /// Key-value storage
    entries: HashMap<K, Entry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Shard-local performance counters
    stats: CacheStats,
    /// Maximum number of entries this shard may hold
    limit: usize,
}

impl<K, V> Shard<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty shard bounded at `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            limit,
        }
    }

    // == Insert ==
    /// Stores an entry, displacing the LRU victim if the shard is full.
    ///
    /// Overwriting an existing key keeps the size constant and moves
    /// the key to most-recently-used. A fresh insert at capacity first
    /// evicts the single entry with the oldest recency in this shard,
    /// then inserts the new entry as most-recently-used.
    pub fn insert(&mut self, key: K, value: V, stamp: u64, expires_at: Instant) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.limit {
            if let Some(victim) = self.lru.evict_oldest() {
                self.entries.remove(&victim);
                self.stats.record_eviction();
            }
        }

        self.entries.insert(key.clone(), Entry::new(value, stamp, expires_at));
        self.lru.touch(&key);
    }

    // == Lookup ==
    /// Retrieves a value by key, promoting it to most-recently-used.
    ///
    /// An entry past its deadline that the expiration worker has not
    /// collected yet is dropped on the spot and reported as absent.
    pub fn lookup(&mut self, key: &K) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                return None;
            }

            let value = entry.value.clone();
            self.stats.record_hit();
            self.lru.touch(key);
            Some(value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Contains ==
    /// Reports presence without altering recency order or counters.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(|entry| !entry.is_expired())
    }

    // == Remove If Current ==
    /// Removes the entry for `key` only if its stamp matches.
    ///
    /// This is how an expiration ticket avoids deleting an entry that
    /// was re-cached after the ticket was issued: the replacement entry
    /// carries a newer stamp, so the stale ticket is a no-op. Returns
    /// whether an entry was removed.
    pub fn remove_if_current(&mut self, key: &K, stamp: u64) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.stamp == stamp => {
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.record_expiration();
                true
            }
            _ => false,
        }
    }

    // == Remove ==
    /// Removes an entry unconditionally. Returns whether it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Removes every entry in the shard.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Returns this shard's counters with the entry count filled in.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}
