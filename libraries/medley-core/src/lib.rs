//! Medley Player - Shared Domain Types
//!
//! Value objects shared by the playback, driver, and artwork crates.
//!
//! The central type is [`Track`]: an immutable description of a playable
//! item as produced by the (out-of-scope) provider transformation layer.
//! Tracks are never mutated after construction; queue and cache layers
//! clone them freely.

mod track;

pub use track::{split_artist_credits, Track, TrackSource};
