//! Player controller - core orchestration
//!
//! Owns the queue, the playback state machine, progress, volume, and repeat
//! mode. UI code requests transitions through the operation set; the audio
//! driver reports back through the `media_*` / `report_*` entry points. State
//! is never set directly from outside.
//!
//! Mutations are synchronous and atomic from the caller's perspective; their
//! consequences (the driver loading a source, a renderer updating) happen
//! when the embedding layer drains the pending events.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    queue::Queue,
    types::{PlaybackConfig, PlaybackState, QueueItem, QueueOrigin, RepeatMode},
    volume::Volume,
};
use medley_core::Track;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Read-only view of the controller state for renderers
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    /// The current track, if any
    pub current_track: Option<Track>,
    /// Playback state
    pub state: PlaybackState,
    /// Seconds elapsed in the current track
    pub progress: Duration,
    /// Authoritative track length, once the driver has reported it
    pub duration: Option<Duration>,
    /// Stored volume in [0, 1]
    pub volume: f32,
    /// Whether output is muted
    pub muted: bool,
    /// Repeat mode
    pub repeat: RepeatMode,
    /// Whether the queue is shuffled
    pub shuffled: bool,
    /// Queue contents in play order
    pub queue: Vec<QueueItem>,
}

/// Queue and transport controller
pub struct PlayerController {
    queue: Queue,
    state: PlaybackState,
    progress: Duration,
    duration: Option<Duration>,
    volume: Volume,
    repeat: RepeatMode,
    config: PlaybackConfig,
    pending_events: Vec<PlaybackEvent>,
}

impl PlayerController {
    /// Create a controller
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            queue: Queue::new(config.max_queue_len),
            state: PlaybackState::Idle,
            progress: Duration::ZERO,
            duration: None,
            volume: Volume::new(config.volume),
            repeat: config.repeat,
            config,
            pending_events: Vec::new(),
        }
    }

    // ===== Queue Operations =====

    /// Replace the queue with `tracks` and start loading the one at
    /// `start_index`
    ///
    /// No-op when `tracks` is empty or `start_index` is out of bounds (UI
    /// double-clicks routinely produce both). Clears shuffle. Availability
    /// is not validated here; the UI pre-filters.
    pub fn play_list(&mut self, tracks: Vec<Track>, start_index: usize) {
        if tracks.is_empty() {
            debug!("play_list with empty track list ignored");
            return;
        }
        if start_index >= tracks.len() {
            debug!(start_index, len = tracks.len(), "play_list start index out of bounds");
            return;
        }

        let previous_id = self.current_track_id();
        let was_shuffled = self.queue.is_shuffled();

        let items = tracks
            .into_iter()
            .map(|t| QueueItem::new(t, QueueOrigin::Playlist))
            .collect();
        self.queue.replace(items, start_index);

        if was_shuffled {
            self.emit(PlaybackEvent::ShuffleChanged { shuffled: false });
        }
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });

        self.reset_position();
        self.emit_track_changed(previous_id);
        self.set_state(PlaybackState::Loading);
    }

    /// Insert a single track immediately after the current one
    pub fn enqueue_next(&mut self, track: Track, origin: QueueOrigin) {
        self.enqueue_many(vec![track], origin);
    }

    /// Insert several tracks immediately after the current one
    ///
    /// The queue length bound applies; overflow trims from the tail.
    pub fn enqueue_many(&mut self, tracks: Vec<Track>, origin: QueueOrigin) {
        if tracks.is_empty() {
            return;
        }

        let items = tracks
            .into_iter()
            .map(|t| QueueItem::new(t, origin))
            .collect();
        self.queue.insert_after_current(items);

        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    /// Remove the queue item at `index`
    ///
    /// Out-of-range indices leave the state untouched; the error is
    /// informational and safe to ignore. Removing the current item makes
    /// the following track current; removing the last item goes idle.
    pub fn remove_at(&mut self, index: usize) -> Result<Track> {
        let previous_id = self.current_track_id();

        let Some(removed) = self.queue.remove(index) else {
            debug!(index, "remove_at out of bounds");
            return Err(PlaybackError::IndexOutOfBounds(index));
        };

        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });

        if self.queue.is_empty() {
            self.reset_position();
            self.emit(PlaybackEvent::TrackChanged {
                track_id: None,
                previous_track_id: previous_id,
            });
            self.set_state(PlaybackState::Idle);
        } else if self.current_track_id() != previous_id {
            self.reset_position();
            self.emit(PlaybackEvent::PositionChanged {
                position: Duration::ZERO,
            });
            self.emit_track_changed(previous_id);
        }

        Ok(removed.track)
    }

    /// Jump to the track at `index` in the queue and start loading it
    pub fn play_from_queue_index(&mut self, index: usize) -> Result<()> {
        if index >= self.queue.len() {
            debug!(index, "play_from_queue_index out of bounds");
            return Err(PlaybackError::IndexOutOfBounds(index));
        }

        let previous_id = self.current_track_id();
        self.queue.set_current(index);
        self.reset_position();
        self.emit_track_changed(previous_id);
        self.set_state(PlaybackState::Loading);
        Ok(())
    }

    /// Toggle shuffle
    ///
    /// Turning it on pins the current track to the front and permutes the
    /// rest; turning it off restores the saved order and relocates the
    /// current index by track id. The sounding track never changes.
    pub fn toggle_shuffle(&mut self) {
        if self.queue.is_empty() {
            debug!("toggle_shuffle on empty queue ignored");
            return;
        }

        if self.queue.is_shuffled() {
            self.queue.shuffle_off();
        } else {
            self.queue.shuffle_on();
        }

        self.emit(PlaybackEvent::ShuffleChanged {
            shuffled: self.queue.is_shuffled(),
        });
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    /// Cycle repeat mode `off → all → one → off`
    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.cycled();
        self.emit(PlaybackEvent::RepeatChanged { mode: self.repeat });
    }

    // ===== Transport =====

    /// Advance to the next track
    ///
    /// At the end of the queue: wraps under repeat-all, otherwise goes idle
    /// with the queue and index untouched so a later play resumes in place.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        let Some(current) = self.queue.current_index() else {
            debug!("next on empty queue ignored");
            return;
        };

        if current + 1 < self.queue.len() {
            self.advance_to(current + 1);
        } else if self.repeat == RepeatMode::All {
            self.advance_to(0);
        } else {
            self.progress = Duration::ZERO;
            self.emit(PlaybackEvent::PositionChanged {
                position: Duration::ZERO,
            });
            self.set_state(PlaybackState::Idle);
        }
    }

    /// Go to the previous track
    ///
    /// More than the restart threshold into the track this restarts in
    /// place. At the front of the queue it wraps under repeat-all, else
    /// restarts index 0.
    pub fn previous(&mut self) {
        let Some(current) = self.queue.current_index() else {
            debug!("previous on empty queue ignored");
            return;
        };

        if self.progress > self.config.previous_restart_threshold {
            self.restart_in_place();
        } else if current == 0 {
            if self.repeat == RepeatMode::All && self.queue.len() > 1 {
                self.advance_to(self.queue.len() - 1);
            } else {
                self.restart_in_place();
            }
        } else {
            self.advance_to(current - 1);
        }
    }

    /// Toggle between playing and paused
    ///
    /// From idle with a playable current track this resumes; in `loading`
    /// and `error` it has no effect.
    pub fn toggle_play(&mut self) {
        match self.state {
            PlaybackState::Playing => self.set_state(PlaybackState::Paused),
            PlaybackState::Paused => self.set_state(PlaybackState::Playing),
            PlaybackState::Idle => {
                let playable = self
                    .queue
                    .current()
                    .is_some_and(|item| item.track.is_playable());
                if playable {
                    self.set_state(PlaybackState::Playing);
                } else {
                    debug!("toggle_play from idle without a playable track ignored");
                }
            }
            PlaybackState::Loading | PlaybackState::Error => {}
        }
    }

    /// Request a reposition within the current track
    ///
    /// Sets progress and emits an explicit `Seeked` event for the driver;
    /// playback state is untouched.
    pub fn seek(&mut self, position: Duration) {
        self.progress = position;
        self.emit(PlaybackEvent::Seeked { position });
    }

    /// Set the volume, clamped into [0, 1]
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.emit_volume();
    }

    /// Toggle mute without altering the stored volume
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.emit_volume();
    }

    // ===== Driver-facing transitions =====

    /// The driver started loading a new source
    pub fn begin_loading(&mut self) {
        self.set_state(PlaybackState::Loading);
    }

    /// The driver found the current track unplayable (no audio URL)
    pub fn report_unplayable(&mut self) {
        self.progress = Duration::ZERO;
        self.set_state(PlaybackState::Idle);
    }

    /// The output reported the source ready to play
    ///
    /// Only promotes `loading → playing`; a late ready event never forces
    /// playback after the user paused or playback stopped.
    pub fn media_ready(&mut self) {
        if self.state == PlaybackState::Loading {
            self.set_state(PlaybackState::Playing);
        } else {
            debug!(state = ?self.state, "ready event outside loading ignored");
        }
    }

    /// The output started playing on its own (e.g. hardware media keys)
    ///
    /// Playing is only reachable with a playable current track, same as
    /// `toggle_play` from idle.
    pub fn media_play(&mut self) {
        let playable = self
            .queue
            .current()
            .is_some_and(|item| item.track.is_playable());
        if self.state != PlaybackState::Playing && playable {
            self.set_state(PlaybackState::Playing);
        }
    }

    /// The output paused on its own
    pub fn media_pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
    }

    /// The output failed to load or play the current source
    ///
    /// Terminal for this track; there is no retry or auto-skip. The UI
    /// decides what happens next.
    pub fn media_error(&mut self) {
        self.set_state(PlaybackState::Error);
    }

    /// The current track played to its end
    ///
    /// Under repeat-one the same track restarts from zero without touching
    /// the queue; otherwise this is exactly `next()`.
    pub fn media_ended(&mut self) {
        if self.repeat == RepeatMode::One {
            self.progress = Duration::ZERO;
            self.emit(PlaybackEvent::Seeked {
                position: Duration::ZERO,
            });
            self.set_state(PlaybackState::Playing);
            return;
        }
        self.next();
    }

    /// Periodic position feed from the driver
    pub fn report_progress(&mut self, position: Duration) {
        self.progress = position;
        self.emit(PlaybackEvent::PositionChanged { position });
    }

    /// Authoritative duration from the output's metadata
    pub fn report_duration(&mut self, duration: Duration) {
        self.duration = Some(duration);
        self.emit(PlaybackEvent::DurationChanged { duration });
    }

    // ===== State Queries =====

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The current track, if any
    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current().map(|item| &item.track)
    }

    /// Index of the current track; `None` iff the queue is empty
    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    /// Elapsed time in the current track
    pub fn progress(&self) -> Duration {
        self.progress
    }

    /// Authoritative track length, once known
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Stored volume in [0, 1]
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Whether output is muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Gain the driver should apply: 0 when muted, else the volume
    pub fn effective_gain(&self) -> f32 {
        self.volume.effective_gain()
    }

    /// Current repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Whether the queue is shuffled
    pub fn is_shuffled(&self) -> bool {
        self.queue.is_shuffled()
    }

    /// Queue contents in play order
    pub fn queue_items(&self) -> &[QueueItem] {
        self.queue.items()
    }

    /// Queue length
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Full state snapshot for renderers
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track: self.current_track().cloned(),
            state: self.state,
            progress: self.progress,
            duration: self.duration,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            repeat: self.repeat,
            shuffled: self.queue.is_shuffled(),
            queue: self.queue.items().to_vec(),
        }
    }

    /// Take all pending events
    ///
    /// The embedding layer forwards these to the audio driver and renderer.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    fn advance_to(&mut self, index: usize) {
        let previous_id = self.current_track_id();
        self.queue.set_current(index);
        self.reset_position();
        self.emit_track_changed(previous_id);
        self.set_state(PlaybackState::Loading);
    }

    fn restart_in_place(&mut self) {
        self.progress = Duration::ZERO;
        self.emit(PlaybackEvent::Seeked {
            position: Duration::ZERO,
        });
    }

    fn reset_position(&mut self) {
        self.progress = Duration::ZERO;
        self.duration = None;
    }

    fn current_track_id(&self) -> Option<String> {
        self.queue.current().map(|item| item.track.id.clone())
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "playback state change");
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_track_changed(&mut self, previous_track_id: Option<String>) {
        self.emit(PlaybackEvent::TrackChanged {
            track_id: self.current_track_id(),
            previous_track_id,
        });
    }

    fn emit_volume(&mut self) {
        self.emit(PlaybackEvent::VolumeChanged {
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}
