// Shared helpers for the integration tests
#![allow(dead_code)]

pub mod mock_upstream;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{ConnectInfo, Request},
    http::{StatusCode, header::CONTENT_TYPE},
};
use deepseek_gateway::{
    build_router, rate_limit::RateLimiter, state::AppState, upstream::DeepSeekClient,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_TIMEOUT: Duration = Duration::from_millis(500);

pub fn client_for(base_url: &str) -> DeepSeekClient {
    DeepSeekClient::new("sk-test", base_url, TEST_TIMEOUT).unwrap()
}

pub fn app_with(upstream: Option<DeepSeekClient>, max_requests: usize) -> Router {
    let state = AppState::new(
        upstream,
        RateLimiter::new(max_requests, Duration::from_secs(60)),
    )
    .with_environment("test");
    build_router(Arc::new(state))
}

pub fn chat_request(body: &str, peer: [u8; 4]) -> Request {
    let mut req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((peer, 40000))));
    req
}

pub async fn send(app: &Router, req: Request) -> (StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
