//! Error types for envelope operations.

use thiserror::Error;

/// Result type alias for envelope operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Envelope codec errors.
///
/// Decoding never produces one of these: an undecodable inbound body is passed through
/// as [`crate::Decoded::Raw`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Payload could not be serialized to JSON.
    #[error("Payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cipher could not be initialized.
    #[error("Invalid key length: {0}")]
    InvalidKeyLength(String),

    /// Ciphertext could not be decrypted or unpadded.
    #[error("Decryption failed: {0}")]
    Decryption(String),
}
