//! Driver integration tests
//!
//! Drives the controller + driver pair against a recording fake output and
//! asserts on the exact sequence of output operations: what gets loaded,
//! when playback starts, and which late events get dropped as stale.

use medley_core::{Track, TrackSource};
use medley_driver::{AudioDriver, AudioOutput, DriverError, MediaEvent};
use medley_playback::{PlaybackState, PlayerController};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Fake output =====

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SetSource(String),
    ClearSource,
    Play,
    Pause,
    SetPosition(Duration),
    SetGain(f32),
}

#[derive(Default)]
struct Shared {
    calls: Mutex<Vec<Call>>,
    outputs_created: AtomicUsize,
    fail_set_source: AtomicBool,
}

impl Shared {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

struct FakeOutput {
    shared: Arc<Shared>,
}

impl AudioOutput for FakeOutput {
    fn set_source(&mut self, url: &str) -> medley_driver::Result<()> {
        if self.shared.fail_set_source.load(Ordering::SeqCst) {
            return Err(DriverError::Output("load rejected".to_string()));
        }
        self.shared.record(Call::SetSource(url.to_string()));
        Ok(())
    }

    fn clear_source(&mut self) -> medley_driver::Result<()> {
        self.shared.record(Call::ClearSource);
        Ok(())
    }

    fn play(&mut self) -> medley_driver::Result<()> {
        self.shared.record(Call::Play);
        Ok(())
    }

    fn pause(&mut self) -> medley_driver::Result<()> {
        self.shared.record(Call::Pause);
        Ok(())
    }

    fn set_position(&mut self, position: Duration) -> medley_driver::Result<()> {
        self.shared.record(Call::SetPosition(position));
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) -> medley_driver::Result<()> {
        self.shared.record(Call::SetGain(gain));
        Ok(())
    }
}

// ===== Helpers =====

fn rig() -> (PlayerController, AudioDriver, Arc<Shared>) {
    let shared = Arc::new(Shared::default());
    let factory_shared = Arc::clone(&shared);
    let driver = AudioDriver::new(move || {
        factory_shared.outputs_created.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeOutput {
            shared: Arc::clone(&factory_shared),
        })
    });
    (PlayerController::default(), driver, shared)
}

fn track(id: &str) -> Track {
    let mut track = Track::new(id, format!("Track {id}"), "Artist", TrackSource::Vk);
    track.duration = Duration::from_secs(180);
    track.audio_url = Some(url(id));
    track
}

fn url(id: &str) -> String {
    format!("https://cdn.example/{id}.mp3")
}

fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

/// Load `ids`, sync, and acknowledge the first track as ready
fn start_playing(
    controller: &mut PlayerController,
    driver: &mut AudioDriver,
    ids: &[&str],
) {
    controller.play_list(tracks(ids), 0);
    driver.sync(controller);
    driver.handle_media(
        controller,
        MediaEvent::Ready {
            track_id: ids[0].to_string(),
        },
    );
}

// ===== Lazy resource creation =====

#[test]
fn output_is_created_lazily_and_only_once() {
    let (mut controller, mut driver, shared) = rig();
    assert!(!driver.has_output());
    assert_eq!(shared.outputs_created.load(Ordering::SeqCst), 0);

    start_playing(&mut controller, &mut driver, &["a", "b", "c"]);
    assert!(driver.has_output());
    assert_eq!(shared.outputs_created.load(Ordering::SeqCst), 1);

    controller.next();
    driver.sync(&mut controller);
    controller.next();
    driver.sync(&mut controller);
    assert_eq!(shared.outputs_created.load(Ordering::SeqCst), 1);
}

#[test]
fn volume_changes_before_first_load_do_not_create_the_output() {
    let (mut controller, mut driver, shared) = rig();
    controller.set_volume(0.5);
    controller.toggle_mute();
    driver.sync(&mut controller);

    assert!(!driver.has_output());
    assert_eq!(shared.outputs_created.load(Ordering::SeqCst), 0);
}

// ===== Loading and ready =====

#[test]
fn sync_loads_the_current_source_but_waits_for_ready() {
    let (mut controller, mut driver, shared) = rig();
    controller.play_list(tracks(&["a"]), 0);
    driver.sync(&mut controller);

    assert!(shared.calls().contains(&Call::SetSource(url("a"))));
    assert_eq!(driver.loaded_track_id(), Some("a"));
    assert_eq!(controller.state(), PlaybackState::Loading);
    assert_eq!(shared.count(|c| *c == Call::Play), 0);
}

#[test]
fn ready_promotes_loading_to_playing_and_starts_the_output() {
    let (mut controller, mut driver, shared) = rig();
    start_playing(&mut controller, &mut driver, &["a"]);

    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(shared.count(|c| *c == Call::Play), 1);
}

#[test]
fn stale_ready_from_a_replaced_source_is_dropped() {
    let (mut controller, mut driver, shared) = rig();
    controller.play_list(tracks(&["a", "b"]), 0);
    driver.sync(&mut controller);

    // User skips before "a" finished loading
    controller.next();
    driver.sync(&mut controller);
    assert_eq!(driver.loaded_track_id(), Some("b"));

    // The late ready for "a" must not start playback
    driver.handle_media(
        &mut controller,
        MediaEvent::Ready {
            track_id: "a".to_string(),
        },
    );
    assert_eq!(controller.state(), PlaybackState::Loading);
    assert_eq!(shared.count(|c| *c == Call::Play), 0);

    driver.handle_media(
        &mut controller,
        MediaEvent::Ready {
            track_id: "b".to_string(),
        },
    );
    assert_eq!(controller.state(), PlaybackState::Playing);
}

#[test]
fn ready_after_the_user_paused_does_not_resume() {
    let (mut controller, mut driver, shared) = rig();
    start_playing(&mut controller, &mut driver, &["a"]);

    controller.toggle_play();
    driver.sync(&mut controller);
    assert_eq!(controller.state(), PlaybackState::Paused);
    let plays_before = shared.count(|c| *c == Call::Play);

    // Duplicate ready from the platform
    driver.handle_media(
        &mut controller,
        MediaEvent::Ready {
            track_id: "a".to_string(),
        },
    );
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(shared.count(|c| *c == Call::Play), plays_before);
}

// ===== Reload guard =====

#[test]
fn replaying_the_loaded_track_rewinds_instead_of_reloading() {
    let (mut controller, mut driver, shared) = rig();
    start_playing(&mut controller, &mut driver, &["a", "b"]);
    driver.handle_media(
        &mut controller,
        MediaEvent::Progress {
            track_id: "a".to_string(),
            position: Duration::from_secs(30),
        },
    );

    controller.play_from_queue_index(0).unwrap();
    driver.sync(&mut controller);

    assert_eq!(shared.count(|c| matches!(c, Call::SetSource(_))), 1);
    assert!(shared.calls().contains(&Call::SetPosition(Duration::ZERO)));
    assert_eq!(controller.state(), PlaybackState::Playing);
}

#[test]
fn repeat_one_restart_reuses_the_loaded_source() {
    let (mut controller, mut driver, shared) = rig();
    start_playing(&mut controller, &mut driver, &["a", "b"]);
    controller.toggle_repeat();
    controller.toggle_repeat(); // off -> all -> one
    driver.sync(&mut controller);
    let loads_before = shared.count(|c| matches!(c, Call::SetSource(_)));

    driver.handle_media(
        &mut controller,
        MediaEvent::Ended {
            track_id: "a".to_string(),
        },
    );

    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(driver.loaded_track_id(), Some("a"));
    assert_eq!(
        shared.count(|c| matches!(c, Call::SetSource(_))),
        loads_before
    );
    assert!(shared.calls().contains(&Call::SetPosition(Duration::ZERO)));
}

#[test]
fn removing_the_playing_track_loads_and_plays_the_next() {
    let (mut controller, mut driver, shared) = rig();
    start_playing(&mut controller, &mut driver, &["a", "b"]);

    // Drop the sounding track out from under playback
    controller.remove_at(0).unwrap();
    driver.sync(&mut controller);

    assert_eq!(controller.state(), PlaybackState::Loading);
    assert_eq!(driver.loaded_track_id(), Some("b"));
    assert!(shared.calls().contains(&Call::SetSource(url("b"))));

    driver.handle_media(
        &mut controller,
        MediaEvent::Ready {
            track_id: "b".to_string(),
        },
    );
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(shared.count(|c| *c == Call::Play), 2);
}

#[test]
fn resume_after_queue_end_replays_without_reloading() {
    let (mut controller, mut driver, shared) = rig();
    start_playing(&mut controller, &mut driver, &["a"]);

    driver.handle_media(
        &mut controller,
        MediaEvent::Ended {
            track_id: "a".to_string(),
        },
    );
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert!(shared.calls().contains(&Call::SetPosition(Duration::ZERO)));

    controller.toggle_play();
    driver.sync(&mut controller);
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(shared.count(|c| matches!(c, Call::SetSource(_))), 1);
}

// ===== Errors =====

#[test]
fn error_with_no_source_loaded_is_ignored() {
    let (mut controller, mut driver, _shared) = rig();
    driver.handle_media(&mut controller, MediaEvent::Error { track_id: None });
    assert_eq!(controller.state(), PlaybackState::Idle);
}

#[test]
fn error_for_a_replaced_source_is_ignored() {
    let (mut controller, mut driver, _shared) = rig();
    controller.play_list(tracks(&["a", "b"]), 0);
    driver.sync(&mut controller);
    controller.next();
    driver.sync(&mut controller);

    driver.handle_media(
        &mut controller,
        MediaEvent::Error {
            track_id: Some("a".to_string()),
        },
    );
    assert_eq!(controller.state(), PlaybackState::Loading);

    driver.handle_media(
        &mut controller,
        MediaEvent::Error {
            track_id: Some("b".to_string()),
        },
    );
    assert_eq!(controller.state(), PlaybackState::Error);
}

#[test]
fn rejected_load_reports_an_error() {
    let (mut controller, mut driver, shared) = rig();
    shared.fail_set_source.store(true, Ordering::SeqCst);

    controller.play_list(tracks(&["a"]), 0);
    driver.sync(&mut controller);

    assert_eq!(controller.state(), PlaybackState::Error);
    assert_eq!(driver.loaded_track_id(), None);
}

#[test]
fn unplayable_track_goes_idle_without_touching_the_output() {
    let (mut controller, mut driver, shared) = rig();
    let mut unplayable = track("a");
    unplayable.audio_url = None;

    controller.play_list(vec![unplayable], 0);
    driver.sync(&mut controller);

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(driver.loaded_track_id(), None);
    assert!(!driver.has_output());
    assert_eq!(shared.outputs_created.load(Ordering::SeqCst), 0);
}

// ===== Feeds and controls =====

#[test]
fn progress_and_metadata_flow_into_the_controller() {
    let (mut controller, mut driver, _shared) = rig();
    start_playing(&mut controller, &mut driver, &["a"]);

    driver.handle_media(
        &mut controller,
        MediaEvent::Metadata {
            track_id: "a".to_string(),
            duration: Duration::from_secs(200),
        },
    );
    driver.handle_media(
        &mut controller,
        MediaEvent::Progress {
            track_id: "a".to_string(),
            position: Duration::from_secs(42),
        },
    );

    assert_eq!(controller.duration(), Some(Duration::from_secs(200)));
    assert_eq!(controller.progress(), Duration::from_secs(42));

    // Stale feed from a source that is no longer loaded
    driver.handle_media(
        &mut controller,
        MediaEvent::Progress {
            track_id: "zzz".to_string(),
            position: Duration::from_secs(999),
        },
    );
    assert_eq!(controller.progress(), Duration::from_secs(42));
}

#[test]
fn seek_and_volume_reach_the_output() {
    let (mut controller, mut driver, shared) = rig();
    start_playing(&mut controller, &mut driver, &["a"]);

    controller.seek(Duration::from_secs(90));
    controller.set_volume(0.3);
    driver.sync(&mut controller);

    assert!(shared
        .calls()
        .contains(&Call::SetPosition(Duration::from_secs(90))));
    assert!(shared.calls().contains(&Call::SetGain(0.3)));

    controller.toggle_mute();
    driver.sync(&mut controller);
    assert!(shared.calls().contains(&Call::SetGain(0.0)));
}

#[test]
fn external_play_and_pause_update_the_state() {
    let (mut controller, mut driver, _shared) = rig();
    start_playing(&mut controller, &mut driver, &["a"]);

    driver.handle_media(&mut controller, MediaEvent::Paused);
    assert_eq!(controller.state(), PlaybackState::Paused);

    driver.handle_media(&mut controller, MediaEvent::Playing);
    assert_eq!(controller.state(), PlaybackState::Playing);
}

#[test]
fn ended_mid_queue_loads_the_next_track() {
    let (mut controller, mut driver, shared) = rig();
    start_playing(&mut controller, &mut driver, &["a", "b"]);

    driver.handle_media(
        &mut controller,
        MediaEvent::Ended {
            track_id: "a".to_string(),
        },
    );

    assert_eq!(driver.loaded_track_id(), Some("b"));
    assert!(shared.calls().contains(&Call::SetSource(url("b"))));
    assert_eq!(controller.state(), PlaybackState::Loading);
}
