//! Playback events
//!
//! Event-based communication for driver and UI synchronization. The
//! controller appends events to a pending queue as a side effect of every
//! observable mutation; the embedding layer drains them and hands them to
//! the audio driver and the renderer.
//!
//! `Seeked` is emitted only for explicit repositioning requests (user seeks,
//! restarts). The driver's own progress feed produces `PositionChanged`,
//! which the driver ignores, so there is no heuristic needed to tell a user
//! seek from a progress tick.

use crate::types::{PlaybackState, RepeatMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// The current track changed identity
    TrackChanged {
        /// ID of the new current track, `None` when the queue emptied
        track_id: Option<String>,
        /// ID of the previous current track, if any
        previous_track_id: Option<String>,
    },

    /// Explicit reposition request; the driver forces the output position
    Seeked {
        /// Target position from the start of the track
        position: Duration,
    },

    /// Progress feed from the audio driver (periodic; informational only)
    PositionChanged {
        /// Current playback position
        position: Duration,
    },

    /// Authoritative track length became known
    DurationChanged {
        /// Track length reported by the output resource
        duration: Duration,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Stored volume level in [0, 1]
        volume: f32,
        /// Whether output is muted
        muted: bool,
    },

    /// Queue contents changed (replace/enqueue/remove/shuffle rebuild)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Shuffle was toggled
    ShuffleChanged {
        /// Whether the queue is now shuffled
        shuffled: bool,
    },

    /// Repeat mode was cycled
    RepeatChanged {
        /// The new repeat mode
        mode: RepeatMode,
    },
}
