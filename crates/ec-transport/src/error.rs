//! Transport and bootstrap errors.

use core::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Transport errors.
///
/// Undecodable response bodies are not errors; they surface as [`crate::Decoded::Raw`].
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, TLS, timeout or body read failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Upstream {endpoint} returned {status}")]
    Status {
        /// Endpoint name (last URL segment).
        endpoint: String,
        /// Status code received.
        status: reqwest::StatusCode,
    },

    /// Payload could not be encoded.
    #[error("Envelope error: {0}")]
    Codec(#[from] ec_crypto::Error),

    /// Configuration rejected before any request was made.
    #[error("Configuration error: {0}")]
    Config(#[from] ec_core::Error),

    /// Registration and state lookup both succeeded, but the session still holds no token.
    #[error("Upstream completed the bootstrap without issuing a token")]
    TokenNotIssued,

    /// Bootstrap task ended without producing a result.
    #[error("Bootstrap task aborted: {0}")]
    Aborted(String),

    /// Session could not be established.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapFailure),
}

impl Error {
    /// Whether the request deadline elapsed.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout(),
            Self::Bootstrap(failure) => failure.source.is_timeout(),
            _ => false,
        }
    }
}

/// Bootstrap stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    /// Unauthenticated app registration.
    Register,
    /// Authenticated state list lookup that mints the token.
    Token,
    /// The spawned bootstrap task itself.
    Task,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("registration"),
            Self::Token => f.write_str("token lookup"),
            Self::Task => f.write_str("bootstrap task"),
        }
    }
}

/// Session bootstrap failure, shared by every caller that waited on the attempt.
#[derive(Debug, Clone, Error)]
#[error("Session bootstrap failed during {step}: {source}")]
pub struct BootstrapFailure {
    /// Failing stage.
    pub step: BootstrapStep,
    /// Underlying error.
    #[source]
    pub source: Arc<Error>,
}

impl BootstrapFailure {
    /// Wrap `source` as a failure of `step`.
    pub fn new(step: BootstrapStep, source: Error) -> Self {
        Self {
            step,
            source: Arc::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_failure_display_names_step() {
        let failure = BootstrapFailure::new(BootstrapStep::Register, Error::TokenNotIssued);
        let err: Error = failure.clone().into();
        let msg = err.to_string();
        assert!(msg.contains("registration"), "{msg}");
        assert!(msg.contains("without issuing a token"), "{msg}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_status_display() {
        let err = Error::Status {
            endpoint: "stateWebService.php".into(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert_eq!(
            err.to_string(),
            "Upstream stateWebService.php returned 502 Bad Gateway"
        );
        assert!(!err.is_timeout());
    }
}
