//! Audio driver - output resource management and reconciliation
//!
//! Owns the single playable output resource and keeps it consistent with
//! the controller. The driver is the only component that touches the
//! output: UI code talks to the controller, the controller emits events,
//! and [`AudioDriver::sync`] translates them into output operations.
//!
//! The resource is created lazily on the first track load and reused for
//! the lifetime of the driver. `loaded_track_id` remembers which source is
//! in the resource so repeated loads of the same track rewind instead of
//! re-fetching, and so late media events from a replaced source can be
//! recognized as stale and dropped.

use crate::output::AudioOutput;
use medley_playback::{PlaybackEvent, PlaybackState, PlayerController};
use std::time::Duration;
use tracing::{debug, warn};

/// Cap on events applied in one reconciliation pass
///
/// Applying events can push new ones (a failed load reports an error, an
/// unplayable track resets to idle). A settled system drains to empty in a
/// couple of rounds; hitting the cap means a feedback loop.
const MAX_SYNC_EVENTS: usize = 256;

type OutputFactory = Box<dyn Fn() -> Box<dyn AudioOutput> + Send>;

/// Asynchronous outcome reported by the output resource
///
/// The embedding layer translates platform callbacks into these and feeds
/// them to [`AudioDriver::handle_media`]. Events carry the track id of the
/// source they belong to so outcomes of an already-replaced source can be
/// told apart from current ones.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The loaded source is ready to play
    Ready {
        /// Track the source belongs to
        track_id: String,
    },

    /// The output started playing on its own (hardware keys, OS controls)
    Playing,

    /// The output paused on its own
    Paused,

    /// The source played to its end
    Ended {
        /// Track the source belongs to
        track_id: String,
    },

    /// The output failed to load or play its source
    Error {
        /// Track the source belongs to, when the platform reports one
        track_id: Option<String>,
    },

    /// Periodic playback position report
    Progress {
        /// Track the source belongs to
        track_id: String,
        /// Position from the start of the track
        position: Duration,
    },

    /// Source metadata became available
    Metadata {
        /// Track the source belongs to
        track_id: String,
        /// Authoritative track length
        duration: Duration,
    },
}

/// Driver for the single audio output resource
pub struct AudioDriver {
    factory: OutputFactory,
    output: Option<Box<dyn AudioOutput>>,
    loaded_track_id: Option<String>,
}

impl AudioDriver {
    /// Create a driver
    ///
    /// `factory` builds the platform output resource; it is called at most
    /// once, on the first track load.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Box<dyn AudioOutput> + Send + 'static,
    {
        Self {
            factory: Box::new(factory),
            output: None,
            loaded_track_id: None,
        }
    }

    /// Drain the controller's pending events and apply them to the output
    ///
    /// Loops until the controller has nothing pending, since applying an
    /// event can push new ones (e.g. a failed load reports an error).
    pub fn sync(&mut self, controller: &mut PlayerController) {
        let mut applied = 0;
        loop {
            let events = controller.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                applied += 1;
                if applied > MAX_SYNC_EVENTS {
                    warn!("reconciliation did not settle; dropping pending events");
                    controller.drain_events();
                    return;
                }
                self.apply(controller, &event);
            }
        }
    }

    /// Feed an asynchronous output event back into the controller
    ///
    /// Events for a source that is no longer loaded are stale and dropped;
    /// the replacement source produces its own events. Errors arriving with
    /// no source loaded at all are platform noise and ignored.
    pub fn handle_media(&mut self, controller: &mut PlayerController, event: MediaEvent) {
        match event {
            MediaEvent::Ready { track_id } => {
                if self.is_loaded(&track_id) {
                    controller.media_ready();
                } else {
                    debug!(%track_id, "ready event for a replaced source ignored");
                }
            }
            MediaEvent::Playing => controller.media_play(),
            MediaEvent::Paused => controller.media_pause(),
            MediaEvent::Ended { track_id } => {
                if self.is_loaded(&track_id) {
                    controller.media_ended();
                } else {
                    debug!(%track_id, "ended event for a replaced source ignored");
                }
            }
            MediaEvent::Error { track_id } => {
                if self.loaded_track_id.is_none() {
                    debug!("error event with no source loaded ignored");
                } else if matches!(&track_id, Some(id) if !self.is_loaded(id)) {
                    debug!(?track_id, "error event for a replaced source ignored");
                } else {
                    warn!(?track_id, "output reported a media error");
                    controller.media_error();
                }
            }
            MediaEvent::Progress { track_id, position } => {
                if self.is_loaded(&track_id) {
                    controller.report_progress(position);
                }
            }
            MediaEvent::Metadata { track_id, duration } => {
                if self.is_loaded(&track_id) {
                    controller.report_duration(duration);
                }
            }
        }

        self.sync(controller);
    }

    /// Track id of the source currently in the output resource
    pub fn loaded_track_id(&self) -> Option<&str> {
        self.loaded_track_id.as_deref()
    }

    /// Whether the output resource has been created yet
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    // ===== Internals =====

    fn apply(&mut self, controller: &mut PlayerController, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::TrackChanged { .. } => self.load_current(controller),
            PlaybackEvent::StateChanged { state } => match state {
                PlaybackState::Playing => self.start_playback(controller),
                PlaybackState::Paused | PlaybackState::Error => self.pause_output(),
                PlaybackState::Idle => self.stop_output(),
                // Loading always follows a TrackChanged; the load is
                // already underway by the time this arrives
                PlaybackState::Loading => {}
            },
            PlaybackEvent::Seeked { position } => {
                if self.loaded_track_id.is_some() {
                    if let Some(output) = self.output.as_mut() {
                        if let Err(err) = output.set_position(*position) {
                            warn!(%err, "seek failed");
                        }
                        // A source that played to its end has stopped even
                        // though the state still says playing (repeat-one
                        // restarts). Repositioning must restart it.
                        if controller.state() == PlaybackState::Playing {
                            if let Err(err) = output.play() {
                                warn!(%err, "play after seek failed");
                            }
                        }
                    }
                }
            }
            PlaybackEvent::VolumeChanged { volume, muted } => {
                let gain = if *muted { 0.0 } else { *volume };
                if let Some(output) = self.output.as_mut() {
                    if let Err(err) = output.set_gain(gain) {
                        warn!(%err, "gain change failed");
                    }
                }
            }
            // Progress/duration originate from the output itself; queue
            // shape and mode changes don't touch the resource
            PlaybackEvent::PositionChanged { .. }
            | PlaybackEvent::DurationChanged { .. }
            | PlaybackEvent::QueueChanged { .. }
            | PlaybackEvent::ShuffleChanged { .. }
            | PlaybackEvent::RepeatChanged { .. } => {}
        }
    }

    /// Point the output at the controller's current track
    ///
    /// Reloading the track that is already in the resource would discard
    /// buffered data for no reason, so a same-id load rewinds to zero
    /// instead and reports ready immediately.
    fn load_current(&mut self, controller: &mut PlayerController) {
        let Some(track) = controller.current_track().cloned() else {
            self.unload();
            return;
        };

        if !track.is_playable() {
            warn!(track_id = %track.id, "current track has no playable source");
            self.unload();
            controller.report_unplayable();
            return;
        }

        if self.is_loaded(&track.id) {
            if let Some(output) = self.output.as_mut() {
                if let Err(err) = output.set_position(Duration::ZERO) {
                    warn!(%err, "rewind failed");
                }
            }
            if controller.state() == PlaybackState::Loading {
                controller.media_ready();
            }
            return;
        }

        // audio_url presence is covered by is_playable above
        let Some(url) = track.audio_url.clone() else {
            return;
        };

        let gain = controller.effective_gain();
        let result = self.ensure_output(gain).set_source(&url);
        match result {
            Ok(()) => {
                debug!(track_id = %track.id, "source loading");
                self.loaded_track_id = Some(track.id);
                // Track changes that don't come through a transport
                // operation (removing the playing track) arrive here still
                // in the old state; the new source is loading now
                controller.begin_loading();
            }
            Err(err) => {
                warn!(%err, track_id = %track.id, "failed to set source");
                self.loaded_track_id = None;
                controller.media_error();
            }
        }
    }

    fn start_playback(&mut self, controller: &mut PlayerController) {
        // Playing can arrive with nothing loaded (resume after the queue
        // ran out); load the current track first
        let current_id = controller.current_track().map(|t| t.id.clone());
        if let Some(id) = current_id {
            if !self.is_loaded(&id) {
                self.load_current(controller);
            }
        }

        if self.loaded_track_id.is_none() {
            return;
        }
        if let Some(output) = self.output.as_mut() {
            if let Err(err) = output.play() {
                warn!(%err, "play failed");
                controller.media_error();
            }
        }
    }

    fn pause_output(&mut self) {
        if let Some(output) = self.output.as_mut() {
            if let Err(err) = output.pause() {
                warn!(%err, "pause failed");
            }
        }
    }

    /// Idle: keep the source loaded but parked at the start
    fn stop_output(&mut self) {
        if let Some(output) = self.output.as_mut() {
            if let Err(err) = output.pause() {
                warn!(%err, "pause failed");
            }
            if let Err(err) = output.set_position(Duration::ZERO) {
                warn!(%err, "rewind failed");
            }
        }
    }

    fn unload(&mut self) {
        if let Some(output) = self.output.as_mut() {
            if let Err(err) = output.pause() {
                warn!(%err, "pause failed");
            }
            if let Err(err) = output.clear_source() {
                warn!(%err, "clearing source failed");
            }
        }
        self.loaded_track_id = None;
    }

    fn ensure_output(&mut self, initial_gain: f32) -> &mut Box<dyn AudioOutput> {
        let Self {
            factory, output, ..
        } = self;
        output.get_or_insert_with(|| {
            debug!("creating the audio output resource");
            let mut created = factory();
            if let Err(err) = created.set_gain(initial_gain) {
                warn!(%err, "initial gain failed");
            }
            created
        })
    }

    fn is_loaded(&self, track_id: &str) -> bool {
        self.loaded_track_id.as_deref() == Some(track_id)
    }
}
