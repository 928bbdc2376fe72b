//! Expiration Worker Module
//!
//! The background task that drains due tickets and removes the entries
//! they identify.

use std::hash::Hash;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheInner;

/// Spawns the expiration worker for a cache instance.
///
/// Exactly one worker runs per cache, for the instance's lifetime. It
/// loops on `scheduler.take()`: each ticket triggers a conditional,
/// stamp-checked removal on the shard the ticket was issued against; a
/// cancellation signal ends the loop. Finding the target entry already
/// gone or superseded is a normal steady-state outcome, never an
/// error: LRU displacement, an explicit removal or a re-cache simply
/// got there first.
///
/// The returned handle backs the cache's worker liveness report: a
/// finished worker means entries no longer expire on a timer.
pub(crate) fn spawn_expiration_worker<K, V>(inner: Arc<CacheInner<K, V>>) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        debug!("expiration worker started");

        while let Some(ticket) = inner.scheduler.take().await {
            let removed = inner.shards[ticket.shard]
                .lock()
                .remove_if_current(&ticket.key, ticket.stamp);

            if removed {
                debug!(shard = ticket.shard, "removed expired entry");
            } else {
                debug!(shard = ticket.shard, "dropped stale expiration ticket");
            }
        }

        info!("expiration worker stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{CacheConfig, ShardedCache};

    fn test_config() -> CacheConfig {
        CacheConfig {
            shard_count: 4,
            per_shard_limit: 16,
            default_timeout_ms: 60_000,
        }
    }

    #[tokio::test]
    async fn test_worker_removes_expired_entries() {
        let cache = ShardedCache::new(test_config()).unwrap();

        cache.cache("expire_soon".to_string(), 1, Some(Duration::from_millis(50)));
        assert!(cache.contains(&"expire_soon".to_string()));

        // Wait for the ticket to come due and the worker to fire it
        tokio::time::sleep(Duration::from_millis(200)).await;

        // The worker removed the entry outright, not just lazily on lookup
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.lookup(&"expire_soon".to_string()), None);
    }

    #[tokio::test]
    async fn test_worker_preserves_valid_entries() {
        let cache = ShardedCache::new(test_config()).unwrap();

        cache.cache("long_lived".to_string(), 1, Some(Duration::from_secs(3600)));
        cache.cache("short_lived".to_string(), 2, Some(Duration::from_millis(50)));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.lookup(&"long_lived".to_string()), Some(1));
        assert_eq!(cache.lookup(&"short_lived".to_string()), None);
    }

    #[tokio::test]
    async fn test_worker_ignores_stale_ticket_after_recache() {
        let cache = ShardedCache::new(test_config()).unwrap();

        cache.cache("key".to_string(), 1, Some(Duration::from_millis(50)));
        // Re-cache before the first ticket fires; the first ticket must
        // not take the replacement down with it
        cache.cache("key".to_string(), 2, Some(Duration::from_secs(3600)));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.lookup(&"key".to_string()), Some(2));
    }

    #[tokio::test]
    async fn test_worker_exits_on_close() {
        let cache: ShardedCache<String, u32> = ShardedCache::new(test_config()).unwrap();
        assert!(cache.expiration_worker_running());

        cache.close();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!cache.expiration_worker_running());
    }
}
