//! Session state and freshness rules.
//!
//! Lifecycle of one court type's session:
//!
//! ```text
//! Uninitialized --bootstrap ok--> Valid --ttl elapsed--> Expired --bootstrap ok--> Valid
//!        \___________________ Initializing (bootstrap in flight) ___________________/
//! ```
//!
//! `Initializing` is owned by the transport layer's single-flight coordinator; this module
//! only knows the three resting phases.

use crate::cookies::CookieJar;
use serde::Serialize;
use std::time::{Duration, Instant};

/// How long a bootstrapped session is trusted before it is re-established.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Observable session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Never bootstrapped.
    Uninitialized,
    /// A bootstrap is in flight; callers wait on it.
    Initializing,
    /// Token present and within TTL.
    Valid,
    /// Bootstrapped before, but stale or without a token.
    Expired,
}

/// Mutable per-court session.
///
/// Fields change only as the result of a completed exchange (or an explicit token
/// override), always under the owner's write lock.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Bearer credential issued by the upstream.
    pub token: Option<String>,
    /// Cookies accumulated from responses.
    pub cookies: CookieJar,
    /// When the last bootstrap completed.
    pub last_refreshed_at: Option<Instant>,
    ttl: Duration,
}

impl SessionState {
    /// Empty, uninitialized session.
    pub fn new() -> Self {
        Self {
            token: None,
            cookies: CookieJar::new(),
            last_refreshed_at: None,
            ttl: SESSION_TTL,
        }
    }

    /// Freshness window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Token present and `now - last_refreshed_at <= ttl`.
    pub fn is_valid(&self, now: Instant) -> bool {
        self.token.is_some()
            && self
                .last_refreshed_at
                .is_some_and(|at| now.saturating_duration_since(at) <= self.ttl)
    }

    /// Resting phase at `now`.
    pub fn phase(&self, now: Instant) -> SessionPhase {
        if self.is_valid(now) {
            SessionPhase::Valid
        } else if self.last_refreshed_at.is_none() {
            SessionPhase::Uninitialized
        } else {
            SessionPhase::Expired
        }
    }

    /// Apply `Set-Cookie` directives from one response. Returns how many were merged.
    pub fn merge_set_cookies<I, S>(&mut self, directives: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cookies.merge_directives(directives)
    }

    /// Replace the token if the response carried a new one. Returns whether it changed.
    pub fn rotate_token(&mut self, token: Option<&str>) -> bool {
        match token {
            Some(token) if self.token.as_deref() != Some(token) => {
                self.token = Some(token.to_owned());
                true
            }
            _ => false,
        }
    }

    /// Commit the outcome of a bootstrap performed on a scratch copy.
    ///
    /// `seen_token` is the token the scratch copy started from. Cookies are overlaid
    /// (exchanges that ran concurrently with the bootstrap keep theirs) and the session is
    /// marked fresh at `now`. The token is replaced unless the live one changed after the
    /// scratch copy was taken, in which case the live token is kept.
    pub fn adopt(&mut self, refreshed: SessionState, seen_token: Option<&str>, now: Instant) {
        self.cookies.merge(&refreshed.cookies);
        if self.token.as_deref() == seen_token {
            self.token = refreshed.token;
        }
        self.last_refreshed_at = Some(now);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
