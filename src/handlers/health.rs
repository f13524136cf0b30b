use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "AI Chat API";

// GET /api/health, upstream state is the one recorded at startup
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "active",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "runtime": "rust",
        "platform": format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
        "environment": state.environment,
        "deepseek_connected": state.upstream_connected(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
