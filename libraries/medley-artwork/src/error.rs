//! Error types for cover resolution

use thiserror::Error;

/// Cover resolution errors
#[derive(Debug, Clone, Error)]
pub enum CoverError {
    /// A provider failed transiently (network, rate limit, parse error)
    ///
    /// Transient by definition: the same lookup may succeed later, so
    /// nothing gets memoized for it.
    #[error("Provider '{provider}' failed: {message}")]
    Provider {
        /// Name of the failing provider
        provider: String,
        /// What went wrong
        message: String,
    },
}

impl CoverError {
    /// Convenience constructor for provider implementations
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Result type for cover resolution
pub type Result<T> = std::result::Result<T, CoverError>;
