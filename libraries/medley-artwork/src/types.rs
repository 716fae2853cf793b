//! Cover resolution types

/// Outcome of a cover resolution request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverStatus {
    /// A cover URL is known for this track
    Resolved(String),
    /// The whole provider chain came up empty; this track has no cover
    Absent,
    /// A lookup for this track is already in flight; ask again later
    Pending,
}

/// Memoized resolution result
///
/// Absent is stored just like a hit: a track the whole chain failed to
/// find a cover for is never looked up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverEntry {
    /// Resolved cover URL
    Url(String),
    /// Permanent negative: no provider has a cover for this track
    Absent,
}

/// Configuration for the cover resolver
#[derive(Debug, Clone)]
pub struct CoverConfig {
    /// Maximum number of memoized entries
    pub cache_capacity: usize,
    /// Maximum provider lookups running at once; excess requests queue FIFO
    pub max_concurrent_lookups: usize,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 2048,
            max_concurrent_lookups: 3,
        }
    }
}
