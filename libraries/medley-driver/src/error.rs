//! Error types for the audio driver

use thiserror::Error;

/// Audio driver errors
#[derive(Debug, Error)]
pub enum DriverError {
    /// The platform output resource rejected an operation
    #[error("Output resource failed: {0}")]
    Output(String),
}

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;
