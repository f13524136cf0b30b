// In-process stand-in for the DeepSeek API
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    Reply,
    Unauthorized,
    ServerError,
    Stall(Duration),
    EmptyChoices,
    Garbage,
}

struct MockState {
    behavior: Behavior,
    chat_hits: AtomicUsize,
}

pub struct MockUpstream {
    pub base_url: String,
    state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockUpstream {
    pub async fn start(behavior: Behavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            chat_hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/v1/models", get(models_handler))
            .route("/v1/chat/completions", post(completions_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            state,
            handle,
        }
    }

    pub fn chat_hits(&self) -> usize {
        self.state.chat_hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// Base URL of a port with nothing listening
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1", addr)
}

async fn models_handler(State(state): State<Arc<MockState>>) -> Response {
    match state.behavior {
        Behavior::Unauthorized => unauthorized(),
        _ => Json(json!({
            "object": "list",
            "data": [{"id": "deepseek-chat", "object": "model"}]
        }))
        .into_response(),
    }
}

async fn completions_handler(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.chat_hits.fetch_add(1, Ordering::SeqCst);

    match state.behavior {
        Behavior::Reply => {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer sk-test");
            if !authorized {
                return unauthorized();
            }
            let user = body["messages"][1]["content"].as_str().unwrap_or_default();
            Json(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "model": body["model"],
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": format!("echo: {}", user)},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
            }))
            .into_response()
        }
        Behavior::Unauthorized => unauthorized(),
        Behavior::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "internal upstream trace", "type": "server_error"}})),
        )
            .into_response(),
        Behavior::Stall(delay) => {
            tokio::time::sleep(delay).await;
            StatusCode::OK.into_response()
        }
        Behavior::EmptyChoices => Json(json!({
            "id": "chatcmpl-2",
            "model": "deepseek-chat",
            "choices": []
        }))
        .into_response(),
        Behavior::Garbage => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"message": "Authentication Fails", "type": "authentication_error"}})),
    )
        .into_response()
}
