//! Medley Player - Audio Driver
//!
//! Bridges the platform audio output and the playback controller.
//!
//! This crate provides:
//! - [`AudioOutput`]: the platform-agnostic trait for the single playable
//!   media resource
//! - [`AudioDriver`]: lazy creation of that resource, source loading with
//!   a reload guard, and reconciliation of controller events into output
//!   operations
//! - [`MediaEvent`]: asynchronous output outcomes fed back through the
//!   driver, with stale events from replaced sources filtered out
//!
//! # Example
//!
//! ```rust,ignore
//! let mut controller = PlayerController::default();
//! let mut driver = AudioDriver::new(|| Box::new(PlatformOutput::new()));
//!
//! controller.play_list(tracks, 0);
//! driver.sync(&mut controller); // output loads the source
//!
//! // later, from the platform callback:
//! driver.handle_media(&mut controller, MediaEvent::Ready { track_id });
//! ```

mod driver;
mod error;
mod output;

pub use driver::{AudioDriver, MediaEvent};
pub use error::{DriverError, Result};
pub use output::AudioOutput;
