//! Encrypted exchanges and session management for the eCourts upstream.
//!
//! Layering:
//! - [`HttpTransport`] performs one exchange: encode, GET, merge cookies, decode.
//! - [`SessionManager`] owns one court type's session and re-establishes it when stale,
//!   running at most one bootstrap at a time.
//! - [`SessionPool`] holds a manager per court type over a shared transport.
//!
//! Nothing here retries. A failed exchange or bootstrap is returned to the caller as is.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod manager;
pub mod pool;

pub use error::{BootstrapFailure, BootstrapStep, Error, Result};
pub use http::{unix_time, Credentials, Exchanged, HttpTransport};
pub use manager::{SessionManager, REGISTER_ENDPOINT, STATE_LIST_ENDPOINT};
pub use pool::SessionPool;

pub use ec_core::{ClientConfig, CourtType, SessionPhase, SessionState};
pub use ec_crypto::Decoded;
