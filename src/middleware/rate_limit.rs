use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

const UNKNOWN_PEER: &str = "unknown";

#[derive(Debug)]
struct WindowState {
    start: Instant,
    count: u32,
}

/// Fixed one-second window per client key. Guards the credential endpoints.
///
/// Clients are keyed by the TCP peer address, which needs the server to be
/// started with `into_make_service_with_connect_info::<SocketAddr>()`. The
/// first `x-forwarded-for` hop is used instead only when `trust_forwarded` is
/// set, i.e. when a reverse proxy that overwrites the header is the sole peer.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    rps: u32,
    trust_forwarded: bool,
    windows: Arc<Mutex<HashMap<String, WindowState>>>,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Self {
        Self {
            rps: rps.max(1),
            trust_forwarded: false,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn trust_forwarded(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        windows.retain(|_, w| now.duration_since(w.start) < Duration::from_secs(60));

        let window = windows.entry(key.to_string()).or_insert(WindowState {
            start: now,
            count: 0,
        });
        if now.duration_since(window.start) >= Duration::from_secs(1) {
            window.start = now;
            window.count = 0;
        }
        if window.count < self.rps {
            window.count += 1;
            true
        } else {
            false
        }
    }

    fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    fn client_key(&self, req: &Request<Body>) -> String {
        if self.trust_forwarded {
            if let Some(hop) = forwarded_for(req) {
                return hop.to_string();
            }
        }
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| UNKNOWN_PEER.to_string())
    }
}

fn forwarded_for(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub async fn rps_middleware(
    State(state): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = state.client_key(&req);
    if !state.allow(&key) {
        tracing::warn!(client = %key, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error":"rate_limit_exceeded"})),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_applies_per_client() {
        let limiter = RateLimiter::new(2);
        let now = Instant::now();
        assert!(limiter.allow_at("a", now));
        assert!(limiter.allow_at("a", now));
        assert!(!limiter.allow_at("a", now));
        assert!(limiter.allow_at("b", now));
    }

    #[test]
    fn window_resets_after_a_second() {
        let limiter = RateLimiter::new(1);
        let now = Instant::now();
        assert!(limiter.allow_at("a", now));
        assert!(!limiter.allow_at("a", now));
        assert!(limiter.allow_at("a", now + Duration::from_millis(1001)));
    }

    fn from_peer(peer: &str, forwarded: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder();
        if let Some(hops) = forwarded {
            builder = builder.header("x-forwarded-for", hops);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        let addr: SocketAddr = peer.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        req
    }

    #[test]
    fn peer_address_keys_by_default() {
        let limiter = RateLimiter::new(1);
        let req = from_peer("192.0.2.7:50000", None);
        assert_eq!(limiter.client_key(&req), "192.0.2.7");

        let other_port = from_peer("192.0.2.7:50001", None);
        assert_eq!(limiter.client_key(&other_port), "192.0.2.7");
    }

    #[test]
    fn forwarded_header_is_ignored_unless_trusted() {
        let limiter = RateLimiter::new(1);
        let spoofed = from_peer("192.0.2.7:50000", Some("10.0.0.1"));
        assert_eq!(limiter.client_key(&spoofed), "192.0.2.7");

        let rotated = from_peer("192.0.2.7:50000", Some("10.0.0.2"));
        let now = Instant::now();
        assert!(limiter.allow_at(&limiter.client_key(&spoofed), now));
        assert!(!limiter.allow_at(&limiter.client_key(&rotated), now));
    }

    #[test]
    fn trusted_proxy_header_picks_first_hop() {
        let limiter = RateLimiter::new(1).trust_forwarded(true);
        let req = from_peer("10.1.0.2:443", Some("10.0.0.1, 172.16.0.1"));
        assert_eq!(limiter.client_key(&req), "10.0.0.1");

        let direct = from_peer("10.1.0.2:443", None);
        assert_eq!(limiter.client_key(&direct), "10.1.0.2");
    }

    #[test]
    fn missing_peer_info_shares_one_bucket() {
        let limiter = RateLimiter::new(1);
        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(limiter.client_key(&bare), UNKNOWN_PEER);
    }
}
