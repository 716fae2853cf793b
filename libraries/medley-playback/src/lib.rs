//! Medley Player - Queue & Transport Controller
//!
//! Platform-agnostic playback management for Medley Player.
//!
//! This crate provides:
//! - A flat playback queue with a current position and a 30-item bound
//! - Shuffle (Fisher-Yates, current track pinned) with exact restore
//! - Repeat modes (Off, All, One)
//! - Transport operations (play/pause/seek/next/previous)
//! - Volume in [0, 1] with independent mute
//! - A pending-event queue for driver/renderer synchronization
//!
//! # Architecture
//!
//! `medley-playback` performs no I/O: it never touches the network, the
//! audio device, or storage. The audio driver (`medley-driver`) consumes the
//! controller's drained events and reports media events back through the
//! `media_*` / `report_*` entry points. UI code requests transitions and
//! renders [`PlayerSnapshot`]s; it never sets state directly.
//!
//! # Example
//!
//! ```rust
//! use medley_core::{Track, TrackSource};
//! use medley_playback::{PlaybackState, PlayerController};
//!
//! let mut controller = PlayerController::default();
//!
//! let mut track = Track::new("t1", "Song", "Artist", TrackSource::Vk);
//! track.audio_url = Some("https://cdn.example/t1.mp3".to_string());
//!
//! controller.play_list(vec![track], 0);
//! assert_eq!(controller.state(), PlaybackState::Loading);
//!
//! // The audio driver reports the source ready:
//! controller.media_ready();
//! assert_eq!(controller.state(), PlaybackState::Playing);
//! ```

mod controller;
mod error;
mod events;
mod queue;
mod shuffle;
mod types;
mod volume;

pub use controller::{PlayerController, PlayerSnapshot};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use types::{PlaybackConfig, PlaybackState, QueueItem, QueueOrigin, RepeatMode};
