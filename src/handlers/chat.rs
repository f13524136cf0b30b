use axum::{Json, body::Bytes, extract::State};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::ChatError;
use crate::metrics::{REQUEST_TOTAL, UPSTREAM_LATENCY};
use crate::models::ChatResponse;
use crate::state::AppState;

// Pull a non-blank `message` out of a raw JSON body
pub fn parse_message(body: &[u8]) -> Result<String, ChatError> {
    if body.is_empty() {
        return Err(ChatError::BadRequest("empty body".to_string()));
    }

    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ChatError::BadRequest(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ChatError::BadRequest("expected a JSON object".to_string()))?;

    match object.get("message").and_then(|m| m.as_str()) {
        Some(message) if !message.trim().is_empty() => Ok(message.to_string()),
        _ => Err(ChatError::InvalidMessage),
    }
}

// POST /api/chat
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ChatError> {
    REQUEST_TOTAL.inc();

    let Some(upstream) = state.upstream.as_ref() else {
        error!("chat request received but the DeepSeek client is not initialized");
        return Err(ChatError::ServiceNotReady);
    };

    let message = parse_message(&body).inspect_err(|e| debug!(error = %e, "rejected chat body"))?;
    info!(chars = message.chars().count(), "received chat message");
    debug!(%message, "chat message content");

    let start_time = Instant::now();
    let result = upstream.chat(&message).await;
    UPSTREAM_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match result {
        Ok(response) => {
            info!(
                model = %response.model,
                prompt_tokens = response.usage.prompt_tokens,
                completion_tokens = response.usage.completion_tokens,
                "generated reply"
            );
            debug!(reply = %response.reply, "reply content");
            Ok(Json(response))
        }
        Err(e) => {
            let err = ChatError::from(e);
            match &err {
                ChatError::Internal(detail) => error!(%detail, "chat request failed"),
                other => warn!(error = %other, "upstream call failed"),
            }
            Err(err)
        }
    }
}
