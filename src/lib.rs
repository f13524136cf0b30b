pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod upstream;

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::error::ChatError;
use crate::state::AppState;

// Router with every route; the rate limiter only guards chat
pub fn build_router(state: Arc<AppState>) -> Router {
    let chat = Router::new()
        .route("/api/chat", post(handlers::chat_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce_rate_limit,
        ));

    Router::new()
        .route("/api/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .merge(chat)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(%detail, "handler panicked");
    ChatError::Internal(detail.to_string()).into_response()
}
