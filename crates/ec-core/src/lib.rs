//! Session state and client configuration for the eCourts protocol engine.
//!
//! This crate holds the plain data the transport layer mutates:
//! - Court types and their upstream base URLs
//! - The cookie jar accumulated from `Set-Cookie` directives
//! - Session state (token, cookies, freshness) and its validity rule
//! - A clock seam so freshness can be tested without sleeping
//!
//! No I/O happens here. Network exchanges live in `ec-transport`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod cookies;
pub mod court;
pub mod error;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ClientConfig;
pub use cookies::CookieJar;
pub use court::CourtType;
pub use error::{Error, Result};
pub use session::{SessionPhase, SessionState, SESSION_TTL};
