//! Embedded eCourts upstream simulator.
//!
//! Zero-config warp server on a random port. It opens every request envelope with the
//! mirrored codec, records what it saw, and answers per endpoint:
//!
//! - `appReleaseWebService.php` → envelope `{"status": "ok"}` + `PHPSESSID` cookie
//! - `stateWebService.php` → envelope `{"token": "TOKEN-<n>", "states": [...]}` + `route` cookie
//! - anything else → envelope echoing the request payload
//!
//! Any endpoint can be overridden with a canned [`Reply`] or slowed down with a delay.

#![allow(dead_code)]

use ec_crypto::{Decoded, EnvelopeCodec};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use warp::http::header::SET_COOKIE;
use warp::http::{Response, StatusCode};
use warp::Filter;

/// Route test logs through the test harness. `RUST_LOG=ec_transport=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One request as the simulator saw it.
#[derive(Debug, Clone)]
pub struct Hit {
    pub court: String,
    pub endpoint: String,
    pub payload: Decoded,
    pub cookie: Option<String>,
    /// Decrypted bearer token, if an `Authorization` header was sent.
    pub bearer: Option<String>,
}

/// Canned answer for one endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Split-form envelope with `Set-Cookie` directives.
    Envelope { body: Value, cookies: Vec<String> },
    /// Full-IV envelope.
    FullIv(Value),
    /// Unencrypted text.
    Plain(String),
    /// Bare status code.
    Status(u16),
}

struct SimState {
    codec: EnvelopeCodec,
    hits: Mutex<Vec<Hit>>,
    replies: Mutex<HashMap<String, Reply>>,
    delays: Mutex<HashMap<String, Duration>>,
    tokens_issued: AtomicUsize,
}

/// Running simulator. Shuts down when dropped.
pub struct Upstream {
    addr: SocketAddr,
    state: Arc<SimState>,
    _shutdown: tokio::sync::oneshot::Sender<()>,
}

impl Upstream {
    /// Start on a random available port.
    pub async fn start() -> Self {
        let state = Arc::new(SimState {
            codec: EnvelopeCodec::upstream().mirrored(),
            hits: Mutex::new(Vec::new()),
            replies: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            tokens_issued: AtomicUsize::new(0),
        });

        // GET /{court}/{endpoint}?params=<envelope>
        let route = warp::path!(String / String)
            .and(warp::get())
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::header::optional::<String>("cookie"))
            .and(warp::header::optional::<String>("authorization"))
            .and(with_state(Arc::clone(&state)))
            .and_then(handle);

        let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let (addr, server) = warp::serve(route).bind_with_graceful_shutdown(addr, async move {
            shutdown_rx.await.ok();
        });
        tokio::spawn(server);

        Self {
            addr,
            state,
            _shutdown: shutdown_tx,
        }
    }

    /// Base URL for a court deployment, e.g. `http://127.0.0.1:PORT/ecourt_mobile_DC/`.
    pub fn base_url(&self, court: &str) -> String {
        format!("http://{}/ecourt_mobile_{}/", self.addr, court)
    }

    /// Override the answer for `endpoint`.
    pub fn reply(&self, endpoint: &str, reply: Reply) {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(endpoint.to_owned(), reply);
    }

    /// Delay every answer from `endpoint`.
    pub fn delay(&self, endpoint: &str, by: Duration) {
        self.state
            .delays
            .lock()
            .unwrap()
            .insert(endpoint.to_owned(), by);
    }

    /// Every request seen so far.
    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    /// Requests seen for `endpoint`.
    pub fn hits_for(&self, endpoint: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|hit| hit.endpoint == endpoint)
            .collect()
    }

    /// Number of tokens minted by `stateWebService.php`.
    pub fn tokens_issued(&self) -> usize {
        self.state.tokens_issued.load(Ordering::SeqCst)
    }
}

fn with_state(
    state: Arc<SimState>,
) -> impl Filter<Extract = (Arc<SimState>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&state))
}

async fn handle(
    court: String,
    endpoint: String,
    query: HashMap<String, String>,
    cookie: Option<String>,
    authorization: Option<String>,
    state: Arc<SimState>,
) -> Result<warp::reply::Response, Infallible> {
    let payload = match query.get("params") {
        Some(envelope) => state.codec.decode(envelope),
        None => Decoded::Raw(String::new()),
    };
    let bearer = authorization
        .as_deref()
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|envelope| {
            state
                .codec
                .decode(envelope)
                .as_structured()
                .and_then(Value::as_str)
                .map(str::to_owned)
        });

    state.hits.lock().unwrap().push(Hit {
        court,
        endpoint: endpoint.clone(),
        payload: payload.clone(),
        cookie,
        bearer,
    });

    let delay = state.delays.lock().unwrap().get(&endpoint).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let canned = state.replies.lock().unwrap().get(&endpoint).cloned();
    let reply = canned.unwrap_or_else(|| default_reply(&state, &endpoint, payload));
    Ok(render(&state.codec, reply))
}

fn default_reply(state: &SimState, endpoint: &str, payload: Decoded) -> Reply {
    match endpoint {
        "appReleaseWebService.php" => Reply::Envelope {
            body: json!({"status": "ok"}),
            cookies: vec!["PHPSESSID=sess-1; path=/; HttpOnly".into()],
        },
        "stateWebService.php" => {
            let n = state.tokens_issued.fetch_add(1, Ordering::SeqCst) + 1;
            Reply::Envelope {
                body: json!({
                    "token": format!("TOKEN-{n}"),
                    "states": [{"state_code": 4, "state_name": "Kerala"}],
                }),
                cookies: vec!["route=r1".into()],
            }
        }
        _ => Reply::Envelope {
            body: json!({"echo": payload.into_value()}),
            cookies: Vec::new(),
        },
    }
}

fn render(codec: &EnvelopeCodec, reply: Reply) -> warp::reply::Response {
    let mut builder = Response::builder();
    let body = match reply {
        Reply::Envelope { body, cookies } => {
            for cookie in cookies {
                builder = builder.header(SET_COOKIE, cookie);
            }
            codec.encode(&body).unwrap()
        }
        Reply::FullIv(body) => codec.encode_full_iv(&body, &[0x3Cu8; 16]).unwrap(),
        Reply::Plain(text) => text,
        Reply::Status(code) => {
            builder = builder.status(StatusCode::from_u16(code).unwrap());
            String::new()
        }
    };
    builder.body(warp::hyper::Body::from(body)).unwrap()
}
