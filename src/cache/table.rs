//! Shard Table Module
//!
//! The cache facade: routes each key deterministically to one shard
//! and composes shard operations, the expiration scheduler and the
//! background worker into the public cache API.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::cache::{CacheStats, Shard};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::expiry::{spawn_expiration_worker, ExpirationScheduler, ExpirationTicket};

// == Cache Inner ==
/// State shared between the cache handle and its expiration worker.
#[derive(Debug)]
pub(crate) struct CacheInner<K, V> {
    /// One independently locked shard per partition of the key space
    pub(crate) shards: Vec<Mutex<Shard<K, V>>>,
    /// Hasher fixed at construction, so routing never changes over the
    /// cache's lifetime
    hasher: RandomState,
    /// Pending expiration tickets, ordered by due time
    pub(crate) scheduler: ExpirationScheduler<ExpirationTicket<K>>,
    /// Timeout applied when `cache` is called without one
    default_timeout: Duration,
    /// Source of entry identity stamps
    stamps: AtomicU64,
}

// == Sharded Cache ==
/// A sharded in-memory cache with per-shard LRU eviction and scheduled
/// per-entry expiration.
///
/// Each key routes deterministically to one shard; shards are locked
/// independently, so calls touching different shards never contend.
/// Every insert also enqueues an expiration ticket; a background
/// worker task drains due tickets and removes entries whose identity
/// stamp still matches, which makes expiration safe against re-cache
/// races without ever scanning the full cache.
///
/// Construction must happen inside a tokio runtime because the worker
/// is a spawned task. Dropping the cache disposes the scheduler and
/// the worker exits; entries stop expiring afterwards by design.
#[derive(Debug)]
pub struct ShardedCache<K, V> {
    inner: Arc<CacheInner<K, V>>,
    worker: JoinHandle<()>,
}

impl<K, V> ShardedCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Builds a cache from a validated configuration and starts its
    /// expiration worker.
    ///
    /// # Errors
    /// Returns a `ConfigError` if any configuration value is zero; no
    /// partially-initialized cache is returned and no worker is
    /// spawned.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let shards = (0..config.shard_count)
            .map(|_| Mutex::new(Shard::new(config.per_shard_limit)))
            .collect();

        let inner = Arc::new(CacheInner {
            shards,
            hasher: RandomState::new(),
            scheduler: ExpirationScheduler::new(),
            default_timeout: config.default_timeout(),
            stamps: AtomicU64::new(0),
        });
        let worker = spawn_expiration_worker(Arc::clone(&inner));

        Ok(Self { inner, worker })
    }

    // == Cache ==
    /// Inserts or overwrites the mapping for `key`, expiring after
    /// `timeout` (or the configured default when `None`).
    ///
    /// Overwriting resets the key's recency and issues a fresh
    /// expiration ticket. The previous ticket is not cancelled here:
    /// it detects at fire time that its entry was superseded and does
    /// nothing.
    pub fn cache(&self, key: K, value: V, timeout: Option<Duration>) {
        let timeout = timeout.unwrap_or(self.inner.default_timeout);
        let stamp = self.inner.stamps.fetch_add(1, Ordering::Relaxed);
        let expires_at = Instant::now() + timeout;
        let shard = self.shard_index(&key);

        self.inner.shards[shard]
            .lock()
            .insert(key.clone(), value, stamp, expires_at);

        self.inner
            .scheduler
            .enqueue(ExpirationTicket::new(key, shard, stamp), timeout);
    }

    // == Lookup ==
    /// Returns the current value for `key`, promoting it to
    /// most-recently-used within its shard.
    ///
    /// Missing and expired keys both come back as `None`; absence is
    /// not an error.
    pub fn lookup(&self, key: &K) -> Option<V> {
        self.inner.shards[self.shard_index(key)].lock().lookup(key)
    }

    // == Contains ==
    /// Reports presence without altering recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.shards[self.shard_index(key)].lock().contains(key)
    }

    // == Remove ==
    /// Removes the mapping if present; a no-op otherwise. Returns
    /// whether an entry was removed.
    pub fn remove(&self, key: &K) -> bool {
        self.inner.shards[self.shard_index(key)].lock().remove(key)
    }

    // == Clear ==
    /// Removes all mappings across all shards.
    ///
    /// Tickets already in flight for the removed keys become inert:
    /// when they fire, the stamp check finds nothing to remove.
    pub fn clear(&self) {
        for shard in &self.inner.shards {
            shard.lock().clear();
        }
    }

    /// Returns the total entry count across all shards.
    pub fn len(&self) -> usize {
        self.inner.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns performance counters aggregated over all shards.
    pub fn stats(&self) -> CacheStats {
        let mut total = CacheStats::new();
        for shard in &self.inner.shards {
            total.merge(&shard.lock().stats());
        }
        total
    }

    // == Worker Liveness ==
    /// Reports whether the expiration worker task is still running.
    ///
    /// A finished worker means the cache no longer expires entries on
    /// a timer. After `close` that is expected; otherwise it signals a
    /// dead expiration pipeline the owning process should act on.
    pub fn expiration_worker_running(&self) -> bool {
        !self.worker.is_finished()
    }

    // == Close ==
    /// Disposes the scheduler, terminating the expiration worker.
    ///
    /// Idempotent. Cached entries remain readable but no further timed
    /// expirations occur.
    pub fn close(&self) {
        self.inner.scheduler.dispose();
    }

    /// Routes a key to its shard. Fixed for the cache's lifetime and
    /// independent of insertion order.
    fn shard_index(&self, key: &K) -> usize {
        (self.inner.hasher.hash_one(key) % self.inner.shards.len() as u64) as usize
    }
}

impl<K, V> Drop for ShardedCache<K, V> {
    fn drop(&mut self) {
        self.inner.scheduler.dispose();
    }
}
