//! Error types for session state and configuration.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Core errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Court type string not recognised.
    #[error("Unknown court type: {0}")]
    UnknownCourtType(String),

    /// Configuration value rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
