//! Envelope codec for the eCourts mobile wire protocol.
//!
//! The upstream service wraps every request and response in an ad-hoc AES envelope:
//! - Outbound: `nonce(16 hex) || iv_index(1 digit) || base64(ciphertext)`
//! - Inbound: the same split form, or `full_iv(32 hex) || base64(ciphertext)`
//!
//! The keys and IV table are protocol constants published by the upstream app, not secrets.
//! Nothing in this crate provides confidentiality; it exists for wire compatibility only.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aes_cbc;
pub mod constants;
pub mod envelope;
pub mod error;

pub use constants::ProtocolConstants;
pub use envelope::{Decoded, EnvelopeCodec};
pub use error::{Error, Result};
