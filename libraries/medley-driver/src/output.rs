//! Platform-agnostic audio output trait
//!
//! Abstracts the one playable media resource for different platforms
//! (HTML audio element, native sink, etc.)

use crate::error::Result;
use std::time::Duration;

/// Platform-agnostic playable output resource
///
/// Implementors wrap a single media resource that can hold one source URL
/// at a time. Loading, decoding, and actual sound output happen behind this
/// trait; outcomes come back asynchronously as [`MediaEvent`]s which the
/// embedding layer feeds into [`AudioDriver::handle_media`].
///
/// [`MediaEvent`]: crate::MediaEvent
/// [`AudioDriver::handle_media`]: crate::AudioDriver::handle_media
pub trait AudioOutput: Send {
    /// Point the resource at a new source URL and begin loading it
    ///
    /// Replaces any previously loaded source.
    fn set_source(&mut self, url: &str) -> Result<()>;

    /// Drop the loaded source, stopping any playback
    fn clear_source(&mut self) -> Result<()>;

    /// Start or resume playback of the loaded source
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the source loaded
    fn pause(&mut self) -> Result<()>;

    /// Reposition within the loaded source
    fn set_position(&mut self, position: Duration) -> Result<()>;

    /// Set the output gain in [0, 1]; 0 is silence
    fn set_gain(&mut self, gain: f32) -> Result<()>;
}
