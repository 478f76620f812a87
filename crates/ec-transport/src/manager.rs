//! Per-court session ownership and single-flight bootstrap.
//!
//! A session is re-established with two exchanges:
//!
//! ```text
//! 1. GET appReleaseWebService.php  {version, uid}                  (no auth)  -> cookies
//! 2. GET stateWebService.php       {action_code: fillState, time, uid} (auth) -> token
//! ```
//!
//! The first caller that finds the session stale spawns the bootstrap as a detached task and
//! publishes a shared handle to it. Every later caller awaits that handle instead of starting
//! a second bootstrap. The task runs on a scratch copy of the session and commits in one
//! write only if both steps succeed and the session ends up holding a token, either newly
//! issued or carried over.

use crate::error::{BootstrapFailure, BootstrapStep};
use crate::http::{unix_time, HttpTransport};
use crate::{Error, Result};
use ec_core::{Clock, CourtType, SessionPhase, SessionState};
use ec_crypto::Decoded;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// App registration endpoint (bootstrap step 1).
pub const REGISTER_ENDPOINT: &str = "appReleaseWebService.php";

/// State list endpoint (bootstrap step 2, mints the token).
pub const STATE_LIST_ENDPOINT: &str = "stateWebService.php";

type InFlight = Shared<BoxFuture<'static, core::result::Result<(), BootstrapFailure>>>;

/// Owns one court type's session.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    court: CourtType,
    transport: Arc<HttpTransport>,
    clock: Arc<dyn Clock>,
    state: RwLock<SessionState>,
    in_flight: Mutex<Option<InFlight>>,
}

impl SessionManager {
    /// Manager for `court` with an empty session.
    pub fn new(court: CourtType, transport: Arc<HttpTransport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                court,
                transport,
                clock,
                state: RwLock::new(SessionState::new()),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Court type this session belongs to.
    pub fn court(&self) -> CourtType {
        self.inner.court
    }

    /// Shared transport.
    pub fn transport(&self) -> &HttpTransport {
        &self.inner.transport
    }

    /// Full URL of `endpoint` on this court's deployment.
    pub fn endpoint(&self, endpoint: &str) -> String {
        self.inner.endpoint(endpoint)
    }

    /// Make sure the session is valid, bootstrapping it if needed.
    ///
    /// Returns immediately when the session is valid. Otherwise joins the bootstrap in
    /// flight, or starts one. Dropping the returned future stops waiting but never aborts
    /// the bootstrap.
    ///
    /// # Errors
    ///
    /// Returns `Error::Bootstrap` naming the failing step. The session is left exactly as
    /// it was before the attempt.
    pub async fn ensure_valid(&self) -> Result<()> {
        if self.inner.is_valid().await {
            return Ok(());
        }
        let flight = self.join_or_start();
        flight.await.map_err(Error::from)
    }

    /// Exchange against this session. Cookies and any rotated token are committed
    /// atomically once the response arrives.
    ///
    /// # Errors
    ///
    /// Propagates transport errors unchanged.
    pub async fn exchange<P>(&self, url: &str, payload: &P, require_auth: bool) -> Result<Decoded>
    where
        P: Serialize + ?Sized,
    {
        self.inner
            .transport
            .exchange(url, payload, require_auth, &self.inner.state)
            .await
    }

    /// Overwrite the token. Cookies and freshness are untouched.
    pub async fn set_token(&self, token: impl Into<String>) {
        self.inner.state.write().await.token = Some(token.into());
        debug!(court = %self.inner.court, "session token set by caller");
    }

    /// Current phase. `Initializing` while a bootstrap is in flight.
    pub async fn phase(&self) -> SessionPhase {
        if lock(&self.inner.in_flight).is_some() {
            return SessionPhase::Initializing;
        }
        self.inner.state.read().await.phase(self.inner.clock.now())
    }

    /// Copy of the current session state.
    pub async fn snapshot(&self) -> SessionState {
        self.inner.state.read().await.clone()
    }

    fn join_or_start(&self) -> InFlight {
        let mut slot = lock(&self.inner.in_flight);
        if let Some(flight) = slot.as_ref() {
            debug!(court = %self.inner.court, "joining in-flight bootstrap");
            return flight.clone();
        }

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = inner.bootstrap().await;
            lock(&inner.in_flight).take();
            result
        });
        let flight = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(BootstrapFailure::new(
                    BootstrapStep::Task,
                    Error::Aborted(e.to_string()),
                )),
            }
        }
        .boxed()
        .shared();

        *slot = Some(flight.clone());
        flight
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("court", &self.inner.court)
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn endpoint(&self, endpoint: &str) -> String {
        self.transport.config().endpoint(self.court, endpoint)
    }

    async fn is_valid(&self) -> bool {
        self.state.read().await.is_valid(self.clock.now())
    }

    async fn bootstrap(&self) -> core::result::Result<(), BootstrapFailure> {
        // A caller may have checked validity just before the previous bootstrap committed.
        let (scratch, seen_token) = {
            let state = self.state.read().await;
            if state.is_valid(self.clock.now()) {
                return Ok(());
            }
            (RwLock::new(state.clone()), state.token.clone())
        };

        info!(court = %self.court, "bootstrapping session");
        let config = self.transport.config();
        let uid = config.default_uid();

        let register = json!({ "version": config.client_version, "uid": uid });
        self.transport
            .exchange(&self.endpoint(REGISTER_ENDPOINT), &register, false, &scratch)
            .await
            .map_err(|e| self.failed(BootstrapStep::Register, e))?;

        let lookup = json!({ "action_code": "fillState", "time": unix_time(), "uid": uid });
        self.transport
            .exchange(&self.endpoint(STATE_LIST_ENDPOINT), &lookup, true, &scratch)
            .await
            .map_err(|e| self.failed(BootstrapStep::Token, e))?;

        let refreshed = scratch.into_inner();
        if refreshed.token.is_none() {
            return Err(self.failed(BootstrapStep::Token, Error::TokenNotIssued));
        }

        self.state
            .write()
            .await
            .adopt(refreshed, seen_token.as_deref(), self.clock.now());
        info!(court = %self.court, "session established");
        Ok(())
    }

    fn failed(&self, step: BootstrapStep, err: Error) -> BootstrapFailure {
        warn!(court = %self.court, %step, error = %err, "session bootstrap failed");
        BootstrapFailure::new(step, err)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
