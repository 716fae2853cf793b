//! Core types for playback management

use chrono::{DateTime, Utc};
use medley_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state
///
/// `Playing` and `Paused` are only reachable when the queue is non-empty
/// and the current track carries an audio URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing loaded, or playback ran off the end of the queue
    Idle,

    /// Waiting for the audio driver to report the source ready
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// The current track failed to load or play; terminal for that track
    Error,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    Off,

    /// Loop the entire queue
    All,

    /// Loop the current track only
    One,
}

impl RepeatMode {
    /// Next mode in the `off → all → one → off` cycle
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// How a track ended up in the queue
///
/// Bookkeeping only; never consulted for ordering decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueOrigin {
    /// Explicitly enqueued by the user
    User,

    /// Added by an autoplay/radio feature
    Autoplay,

    /// Came in as part of a playlist load
    Playlist,
}

/// A track wrapped with queue bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// The wrapped track
    pub track: Track,

    /// When the item entered the queue
    pub added_at: DateTime<Utc>,

    /// How the item entered the queue
    pub origin: QueueOrigin,
}

impl QueueItem {
    /// Wrap a track for queueing
    pub fn new(track: Track, origin: QueueOrigin) -> Self {
        Self {
            track,
            added_at: Utc::now(),
            origin,
        }
    }
}

/// Configuration for the player controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum queue length; enqueues past this trim from the tail (default: 30)
    pub max_queue_len: usize,

    /// `previous()` restarts the current track when progress exceeds this
    /// threshold instead of moving back (default: 3s)
    pub previous_restart_threshold: Duration,

    /// Initial volume in [0, 1] (default: 0.8)
    pub volume: f32,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_queue_len: 30,
            previous_restart_threshold: Duration::from_secs(3),
            volume: 0.8,
            repeat: RepeatMode::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.max_queue_len, 30);
        assert_eq!(config.previous_restart_threshold, Duration::from_secs(3));
        assert_eq!(config.volume, 0.8);
        assert_eq!(config.repeat, RepeatMode::Off);
    }

    #[test]
    fn repeat_mode_cycles() {
        assert_eq!(RepeatMode::Off.cycled(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycled(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycled(), RepeatMode::Off);
    }
}
