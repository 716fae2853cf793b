//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Most controller operations deliberately prefer silent no-ops over errors
/// (spurious out-of-range requests are routine under UI races); an error is
/// returned only where the caller genuinely needs to know.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
