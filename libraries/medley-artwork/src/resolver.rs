//! Cover resolver - provider chain with permanent memoization
//!
//! Tracks arrive either with a cover URL from their own source (returned
//! as-is) or without one, in which case the provider chain is consulted at
//! most once per track: both hits and definitive misses are memoized, so a
//! track the whole chain came up empty for is never looked up again.
//! Transient provider failures are the one exception; they leave no trace
//! and the next request retries.

use crate::error::{CoverError, Result};
use crate::provider::CoverProvider;
use crate::store::{CoverStore, MemoryCoverStore};
use crate::types::{CoverConfig, CoverEntry, CoverStatus};
use medley_core::Track;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Resolves cover art through a chain of providers with memoization
pub struct CoverResolver {
    providers: Vec<Arc<dyn CoverProvider>>,
    store: Box<dyn CoverStore>,
    pending: Mutex<HashSet<String>>,
    lookup_slots: Semaphore,
}

/// Removes the key from the pending set when the lookup finishes,
/// whichever way it finishes
struct PendingGuard<'a> {
    pending: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.lock().unwrap().remove(&self.key);
    }
}

impl CoverResolver {
    /// Create a resolver over a provider chain with the bundled in-memory
    /// store
    ///
    /// Providers are tried in the given order; the first hit wins.
    pub fn new(providers: Vec<Arc<dyn CoverProvider>>, config: CoverConfig) -> Self {
        let store = Box::new(MemoryCoverStore::new(config.cache_capacity));
        Self::with_store(providers, store, &config)
    }

    /// Create a resolver over a custom [`CoverStore`]
    pub fn with_store(
        providers: Vec<Arc<dyn CoverProvider>>,
        store: Box<dyn CoverStore>,
        config: &CoverConfig,
    ) -> Self {
        Self {
            providers,
            store,
            pending: Mutex::new(HashSet::new()),
            // tokio's semaphore queues waiters FIFO, which keeps lookup
            // order fair under load
            lookup_slots: Semaphore::new(config.max_concurrent_lookups.max(1)),
        }
    }

    /// Resolve a cover for `track`
    ///
    /// Returns immediately on a native cover URL, a memoized result, or a
    /// lookup already in flight for the same track. Otherwise runs the
    /// provider chain (bounded by the concurrency limit) and memoizes the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Fails when a provider failed transiently and no later provider in
    /// the chain produced a hit. Nothing is memoized in that case; the
    /// same call may succeed on retry.
    pub async fn resolve(&self, track: &Track) -> Result<CoverStatus> {
        if let Some(url) = track.cover_url.as_ref().filter(|url| !url.is_empty()) {
            return Ok(CoverStatus::Resolved(url.clone()));
        }

        let key = Self::cache_key(track);

        if let Some(entry) = self.store.get(&key) {
            return Ok(entry.into());
        }

        {
            let mut pending = self.pending.lock().unwrap();
            if !pending.insert(key.clone()) {
                debug!(%key, "lookup already in flight");
                return Ok(CoverStatus::Pending);
            }
        }
        let _guard = PendingGuard {
            pending: &self.pending,
            key: key.clone(),
        };

        let Ok(_permit) = self.lookup_slots.acquire().await else {
            // Only reachable if the semaphore were closed; treat as busy
            return Ok(CoverStatus::Pending);
        };

        // Someone may have finished this exact lookup while we queued
        if let Some(entry) = self.store.get(&key) {
            return Ok(entry.into());
        }

        self.run_chain(track, &key).await
    }

    /// Memoized status for `track`, without triggering a lookup
    pub fn cached(&self, track: &Track) -> Option<CoverStatus> {
        let key = Self::cache_key(track);
        self.store.get(&key).map(CoverStatus::from)
    }

    /// Whether a lookup for `track` is currently in flight
    pub fn is_pending(&self, track: &Track) -> bool {
        let key = Self::cache_key(track);
        self.pending.lock().unwrap().contains(&key)
    }

    // ===== Internals =====

    async fn run_chain(&self, track: &Track, key: &str) -> Result<CoverStatus> {
        let mut failure: Option<CoverError> = None;

        // Providers match best on a single artist, so a collaboration
        // credit queries under its primary artist only
        let artist = track.primary_artist();

        for provider in &self.providers {
            match provider.lookup(artist, &track.title).await {
                Ok(Some(url)) => {
                    debug!(provider = provider.name(), %key, "cover resolved");
                    self.store.put(key, CoverEntry::Url(url.clone()));
                    return Ok(CoverStatus::Resolved(url));
                }
                Ok(None) => {
                    debug!(provider = provider.name(), %key, "provider has no cover");
                }
                Err(err) => {
                    warn!(provider = provider.name(), %err, "provider lookup failed");
                    failure = Some(err);
                }
            }
        }

        // A failed provider might still have had this cover, so a miss is
        // only definitive when every provider answered
        if let Some(err) = failure {
            return Err(err);
        }

        debug!(%key, "no provider has a cover; memoizing the miss");
        self.store.put(key, CoverEntry::Absent);
        Ok(CoverStatus::Absent)
    }

    /// Stable cache key: the track id when there is one, otherwise a
    /// case-folded artist/title pair
    fn cache_key(track: &Track) -> String {
        if track.id.is_empty() {
            format!(
                "{}::{}",
                track.artist.to_lowercase(),
                track.title.to_lowercase()
            )
        } else {
            track.id.clone()
        }
    }
}

impl From<CoverEntry> for CoverStatus {
    fn from(entry: CoverEntry) -> Self {
        match entry {
            CoverEntry::Url(url) => CoverStatus::Resolved(url),
            CoverEntry::Absent => CoverStatus::Absent,
        }
    }
}
