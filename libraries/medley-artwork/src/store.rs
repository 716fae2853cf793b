//! Cover entry stores
//!
//! The resolver memoizes through this boundary so embedders can persist
//! entries (browser storage, a sidecar file) instead of losing them on
//! restart. The bundled store keeps them in a bounded in-memory LRU.

use crate::types::CoverEntry;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Persistence boundary for memoized cover entries
pub trait CoverStore: Send + Sync {
    /// Memoized entry for `key`, if any
    fn get(&self, key: &str) -> Option<CoverEntry>;

    /// Memoize `entry` under `key`, replacing any previous entry
    fn put(&self, key: &str, entry: CoverEntry);
}

/// In-memory store backed by a bounded LRU cache
///
/// Entries never expire; when the store is full the least recently used
/// entry is evicted and its track costs one more lookup later.
pub struct MemoryCoverStore {
    entries: Mutex<LruCache<String, CoverEntry>>,
}

impl MemoryCoverStore {
    /// Create a store holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl CoverStore for MemoryCoverStore {
    fn get(&self, key: &str) -> Option<CoverEntry> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, entry: CoverEntry) {
        self.entries.lock().unwrap().put(key.to_string(), entry);
    }
}
