//! One encrypted exchange against the upstream.
//!
//! Wire shape of a request:
//!
//! ```text
//! GET {base_url}{endpoint}?params=<envelope>
//! User-Agent: <mobile client>
//! Accept: */*
//! Cookie: <jar>                            (when non-empty)
//! Authorization: Bearer <envelope(token)>  (authenticated calls with a token)
//! ```
//!
//! The exchange is split into a lock-free network half ([`HttpTransport::send`]) and a
//! commit half ([`Exchanged::apply_to`]) so that concurrent requests never hold the
//! session lock across I/O.

use crate::{Error, Result};
use ec_core::{ClientConfig, SessionState};
use ec_crypto::{Decoded, EnvelopeCodec};
use reqwest::header::{ACCEPT, AUTHORIZATION, COOKIE, SET_COOKIE};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Query parameter carrying the envelope.
pub const ENVELOPE_PARAM: &str = "params";

/// Credentials captured from a session before a request goes out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// `Cookie` header value.
    pub cookie_header: Option<String>,
    /// Plain bearer token; re-encrypted per request.
    pub token: Option<String>,
}

impl Credentials {
    /// Snapshot `state`. The token is only captured for authenticated calls.
    pub fn capture(state: &SessionState, require_auth: bool) -> Self {
        Self {
            cookie_header: state.cookies.header_value(),
            token: if require_auth {
                state.token.clone()
            } else {
                None
            },
        }
    }
}

/// Response of one exchange, not yet applied to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchanged {
    /// Decoded body.
    pub body: Decoded,
    /// Raw `Set-Cookie` directives, in response order.
    pub set_cookies: Vec<String>,
}

impl Exchanged {
    /// Merge cookies and rotate the token in one step.
    ///
    /// Any response carrying a non-empty `token` field replaces the session token, not
    /// only bootstrap responses.
    pub fn apply_to(&self, state: &mut SessionState) {
        let merged = state.merge_set_cookies(&self.set_cookies);
        if merged > 0 {
            debug!(merged, total = state.cookies.len(), "session cookies updated");
        }
        if state.rotate_token(self.body.token()) {
            info!("session token rotated by upstream");
        }
    }

    /// Take the decoded body.
    pub fn into_body(self) -> Decoded {
        self.body
    }
}

/// HTTP transport for the upstream protocol.
///
/// Cloning is cheap; clones share the connection pool and codec.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    codec: Arc<EnvelopeCodec>,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Transport with the upstream codec.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_codec(config, EnvelopeCodec::upstream())
    }

    /// Transport with a custom codec.
    pub fn with_codec(config: ClientConfig, codec: EnvelopeCodec) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            codec: Arc::new(codec),
            config: Arc::new(config),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Codec in use.
    pub fn codec(&self) -> &EnvelopeCodec {
        &self.codec
    }

    /// Send one request without touching any session.
    ///
    /// # Errors
    ///
    /// - `Error::Codec` if the payload cannot be encoded
    /// - `Error::Http` on connection failure or deadline exceeded
    /// - `Error::Status` on a non-2xx answer
    pub async fn send<P>(
        &self,
        url: &str,
        payload: &P,
        credentials: &Credentials,
    ) -> Result<Exchanged>
    where
        P: Serialize + ?Sized,
    {
        let endpoint = endpoint_name(url);
        debug!(endpoint, "calling upstream");

        let envelope = self.codec.encode(payload)?;
        let mut request = self
            .client
            .get(url)
            .query(&[(ENVELOPE_PARAM, envelope.as_str())])
            .header(ACCEPT, "*/*");

        if let Some(cookies) = &credentials.cookie_header {
            request = request.header(COOKIE, cookies.as_str());
        }
        if let Some(token) = &credentials.token {
            let bearer = self.codec.encode(token.as_str())?;
            request = request.header(AUTHORIZATION, format!("Bearer {bearer}"));
        }

        let response = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "upstream request failed");
            Error::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, %status, "upstream returned error status");
            return Err(Error::Status {
                endpoint: endpoint.to_owned(),
                status,
            });
        }

        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_owned)
            .collect();
        let text = response.text().await?;

        Ok(Exchanged {
            body: self.codec.decode(&text),
            set_cookies,
        })
    }

    /// Full exchange against `session`: snapshot credentials, send, then merge cookies
    /// and rotate the token under one write lock.
    pub async fn exchange<P>(
        &self,
        url: &str,
        payload: &P,
        require_auth: bool,
        session: &RwLock<SessionState>,
    ) -> Result<Decoded>
    where
        P: Serialize + ?Sized,
    {
        let credentials = Credentials::capture(&*session.read().await, require_auth);
        let exchanged = self.send(url, payload, &credentials).await?;
        exchanged.apply_to(&mut *session.write().await);
        Ok(exchanged.into_body())
    }
}

/// Unix time in seconds with millisecond fraction, as the upstream's `time` field expects.
pub fn unix_time() -> String {
    (chrono::Utc::now().timestamp_millis() as f64 / 1000.0).to_string()
}

/// Last path segment of `url`, for logs and errors.
fn endpoint_name(url: &str) -> &str {
    let path = url.split('?').next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}
