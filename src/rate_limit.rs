use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::ChatError;
use crate::metrics::RATE_LIMITED_TOTAL;
use crate::state::AppState;

/// Sliding-window request log per client.
///
/// Each client keeps the timestamps of its admitted requests that are still
/// inside the window. Entries are pruned on every access; clients whose log
/// ends up empty are only dropped by [`RateLimiter::cleanup`].
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    clients: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    /// `max_requests = 0` disables limiting.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: DashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_requests > 0
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` and records `now` if the client is under its limit.
    /// A rejected request leaves the log untouched.
    pub fn admit(&self, client_id: &str, now: Instant) -> bool {
        if !self.is_enabled() {
            return true;
        }

        let mut log = self.clients.entry(client_id.to_string()).or_default();
        prune(&mut log, now, self.window);

        if log.len() >= self.max_requests {
            return false;
        }

        log.push_back(now);
        true
    }

    /// Time until the oldest logged request leaves the window.
    pub fn retry_after(&self, client_id: &str, now: Instant) -> Duration {
        self.clients
            .get(client_id)
            .and_then(|log| log.front().copied())
            .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(oldest)))
            .unwrap_or_default()
    }

    /// Prunes every client and evicts the ones with nothing left in the
    /// window. Returns how many were evicted.
    pub fn cleanup(&self, now: Instant) -> usize {
        let before = self.clients.len();
        let window = self.window;
        self.clients.retain(|_, log| {
            prune(log, now, window);
            !log.is_empty()
        });
        before.saturating_sub(self.clients.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = log.front() {
        if now.saturating_duration_since(oldest) > window {
            log.pop_front();
        } else {
            break;
        }
    }
}

// Rate limit key: first X-Forwarded-For hop when trusted, else the peer IP
pub fn client_id(req: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// Middleware guarding the chat route
pub async fn enforce_rate_limit(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_id(&req, state.trust_forwarded_for);
    let now = Instant::now();

    if state.rate_limiter.admit(&client, now) {
        return next.run(req).await;
    }

    RATE_LIMITED_TOTAL.inc();
    let wait = state.rate_limiter.retry_after(&client, now);
    // round up so clients never retry before the slot frees
    let wait_secs = (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1);
    tracing::warn!(client = %client, retry_after = wait_secs, "rate limit exceeded");

    let mut response = ChatError::RateLimited {
        max_requests: state.rate_limiter.max_requests(),
        window_secs: state.rate_limiter.window().as_secs(),
    }
    .into_response();
    response
        .headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(wait_secs));
    response
}
