//! Expiration Ticket Module
//!
//! The record pairing a key with its entry's identity stamp for
//! scheduled removal.

// == Expiration Ticket ==
/// A scheduled removal order for one specific cache entry.
///
/// Every `cache()` call issues exactly one ticket, including re-caches
/// of an existing key. A ticket is consumed once by the expiration
/// worker; it removes its target only if the shard still holds the
/// entry with the matching stamp, so tickets left over after an
/// eviction, removal, clear or re-cache fire as harmless no-ops.
#[derive(Debug, Clone)]
pub struct ExpirationTicket<K> {
    /// Key the ticket was issued for
    pub key: K,
    /// Index of the shard the key routes to
    pub shard: usize,
    /// Identity stamp of the entry this ticket may remove
    pub stamp: u64,
}

impl<K> ExpirationTicket<K> {
    /// Creates a ticket for the entry identified by `stamp`.
    pub fn new(key: K, shard: usize, stamp: u64) -> Self {
        Self { key, shard, stamp }
    }
}
