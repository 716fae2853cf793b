//! Track domain type

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a track was aggregated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackSource {
    /// VK music catalog
    Vk,

    /// Yandex Music catalog
    Yandex,

    /// Locally uploaded file
    Local,
}

/// A playable track
///
/// Immutable once constructed. `id` is globally unique and stable across
/// sessions, so it doubles as the cache key for cover resolution and the
/// identity check for queue/driver reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist credit as free text
    ///
    /// May encode several collaborators ("A feat. B", "A & B", "A, B").
    /// Use [`Track::artist_credits`] to split them.
    pub artist: String,

    /// Track length
    pub duration: Duration,

    /// Cover image URL supplied by the provider, if any
    pub cover_url: Option<String>,

    /// Stream URL; `None` means the track cannot be played
    pub audio_url: Option<String>,

    /// Whether the provider reports this track as available
    ///
    /// Unavailable tracks may still be displayed but must not sound.
    pub is_available: bool,

    /// Originating catalog
    pub source: TrackSource,
}

impl Track {
    /// Create a track with minimal metadata
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        source: TrackSource,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration: Duration::ZERO,
            cover_url: None,
            audio_url: None,
            is_available: true,
            source,
        }
    }

    /// Whether this track can actually be loaded into the audio output
    pub fn is_playable(&self) -> bool {
        self.is_available && self.audio_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// All artist credits in the free-text artist field
    pub fn artist_credits(&self) -> Vec<&str> {
        split_artist_credits(&self.artist)
    }

    /// The first (primary) artist credit
    ///
    /// Falls back to the whole field when no separator is recognised.
    pub fn primary_artist(&self) -> &str {
        self.artist_credits()
            .into_iter()
            .next()
            .unwrap_or(self.artist.as_str())
    }
}

/// Separators conventionally used to join collaborators in an artist credit.
/// Order matters: multi-word separators are applied before single characters.
const CREDIT_SEPARATORS: [&str; 5] = [" feat. ", " ft. ", " x ", " & ", ","];

/// Split a free-text artist credit into individual artists
///
/// Splitting is ASCII-case-insensitive ("FEAT." works) and trims whitespace.
/// Empty fragments are dropped.
pub fn split_artist_credits(artist: &str) -> Vec<&str> {
    let mut parts = vec![artist];

    for sep in CREDIT_SEPARATORS {
        let mut next = Vec::with_capacity(parts.len());
        for part in parts {
            next.extend(split_ignore_ascii_case(part, sep));
        }
        parts = next;
    }

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split on a separator without regard to ASCII case
fn split_ignore_ascii_case<'a>(haystack: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let len = sep.len();
    let mut start = 0;
    let mut i = 0;

    while i + len <= haystack.len() {
        if haystack.is_char_boundary(i)
            && haystack.is_char_boundary(i + len)
            && haystack[i..i + len].eq_ignore_ascii_case(sep)
        {
            parts.push(&haystack[start..i]);
            i += len;
            start = i;
        } else {
            i += 1;
        }
    }

    parts.push(&haystack[start..]);
    parts
}
