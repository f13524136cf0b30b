use std::sync::Arc;

use crate::rate_limit::RateLimiter;
use crate::upstream::DeepSeekClient;

// app's shared state

pub struct AppState {
    pub upstream: Option<Arc<DeepSeekClient>>, // None when startup init failed
    pub rate_limiter: RateLimiter,
    pub environment: String, // deployment label for /api/health
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(upstream: Option<DeepSeekClient>, rate_limiter: RateLimiter) -> Self {
        Self {
            upstream: upstream.map(Arc::new),
            rate_limiter,
            environment: "development".to_string(),
            trust_forwarded_for: false,
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    pub fn upstream_connected(&self) -> bool {
        self.upstream.is_some()
    }
}
