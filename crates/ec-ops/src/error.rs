//! Domain operation errors.

use ec_transport::Decoded;
use thiserror::Error;

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Domain operation errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Request rejected before any network I/O.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Session or exchange failure.
    #[error(transparent)]
    Transport(#[from] ec_transport::Error),

    /// Upstream answered, but without the expected collection.
    #[error("No {field} data found in upstream response")]
    MissingData {
        /// Expected top-level key.
        field: &'static str,
        /// Whatever the upstream sent instead.
        body: Decoded,
    },
}

impl Error {
    /// `"<field> is required"`.
    pub(crate) fn required(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }
}
