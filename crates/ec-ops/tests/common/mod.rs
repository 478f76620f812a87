//! Minimal embedded upstream for domain operation tests.
//!
//! Answers bootstrap calls like the real service, echoes the decrypted payload for any
//! other endpoint unless a canned body was registered, and records every request.

#![allow(dead_code)]

use ec_crypto::{Decoded, EnvelopeCodec};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use warp::Filter;

#[derive(Default)]
struct Recorded {
    requests: Vec<(String, Decoded)>,
    bodies: HashMap<String, Value>,
}

/// Running upstream. Shuts down when dropped.
pub struct FakeUpstream {
    addr: SocketAddr,
    recorded: Arc<Mutex<Recorded>>,
    _shutdown: tokio::sync::oneshot::Sender<()>,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let codec = Arc::new(EnvelopeCodec::upstream().mirrored());

        let state = Arc::clone(&recorded);
        let route = warp::path!(String / String)
            .and(warp::get())
            .and(warp::query::<HashMap<String, String>>())
            .map(move |_court: String, endpoint: String, query: HashMap<String, String>| {
                let payload = codec.decode(query.get("params").map(String::as_str).unwrap_or(""));
                let mut recorded = state.lock().unwrap();
                recorded.requests.push((endpoint.clone(), payload.clone()));

                let body = match (endpoint.as_str(), recorded.bodies.get(&endpoint)) {
                    (_, Some(body)) => body.clone(),
                    ("appReleaseWebService.php", None) => json!({"status": "ok"}),
                    ("stateWebService.php", None) => json!({
                        "token": "TOKEN",
                        "states": [{"state_code": 4, "state_name": "Kerala"}],
                    }),
                    (_, None) => json!({"echo": payload.into_value()}),
                };
                warp::reply::with_header(
                    codec.encode(&body).unwrap(),
                    "set-cookie",
                    "PHPSESSID=fake",
                )
            });

        let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let (addr, server) = warp::serve(route).bind_with_graceful_shutdown(addr, async move {
            shutdown_rx.await.ok();
        });
        tokio::spawn(server);

        Self {
            addr,
            recorded,
            _shutdown: shutdown_tx,
        }
    }

    pub fn base_url(&self, court: &str) -> String {
        format!("http://{}/ecourt_mobile_{}/", self.addr, court)
    }

    /// Answer `endpoint` with `body` from now on.
    pub fn respond(&self, endpoint: &str, body: Value) {
        self.recorded
            .lock()
            .unwrap()
            .bodies
            .insert(endpoint.to_owned(), body);
    }

    /// Decrypted payloads sent to `endpoint`.
    pub fn payloads(&self, endpoint: &str) -> Vec<Value> {
        self.recorded
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(name, _)| name == endpoint)
            .map(|(_, payload)| payload.clone().into_value())
            .collect()
    }

    /// Total requests seen.
    pub fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().requests.len()
    }
}
