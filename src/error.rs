use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::ERRORS_TOTAL;
use crate::upstream::UpstreamError;

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Every way a chat request can fail, one variant per response shape.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("upstream client is not initialized")]
    ServiceNotReady,
    #[error("request body is not a JSON object: {0}")]
    BadRequest(String),
    #[error("message field is missing or empty")]
    InvalidMessage,
    #[error("rate limit of {max_requests} per {window_secs}s exceeded")]
    RateLimited { max_requests: usize, window_secs: u64 },
    #[error("upstream rejected the API key")]
    AuthFailed,
    #[error("could not connect to upstream")]
    ConnectionFailed,
    #[error("upstream timed out")]
    Timeout,
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::ServiceNotReady => StatusCode::INTERNAL_SERVER_ERROR,
            ChatError::BadRequest(_) | ChatError::InvalidMessage => StatusCode::BAD_REQUEST,
            ChatError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ChatError::AuthFailed => StatusCode::UNAUTHORIZED,
            ChatError::ConnectionFailed => StatusCode::SERVICE_UNAVAILABLE,
            ChatError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ChatError::Upstream { .. } | ChatError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ChatError::ServiceNotReady => "service-not-ready",
            ChatError::BadRequest(_) => "bad-request",
            ChatError::InvalidMessage => "invalid-message",
            ChatError::RateLimited { .. } => "rate-limited",
            ChatError::AuthFailed => "auth-failed",
            ChatError::ConnectionFailed => "connection-failed",
            ChatError::Timeout => "timeout",
            ChatError::Upstream { .. } => "upstream-error",
            ChatError::Internal(_) => "internal-error",
        }
    }

    // Caller-facing body; never carries the Display text of upstream or
    // internal failures
    pub fn body(&self) -> ErrorBody {
        let (message, details) = match self {
            ChatError::ServiceNotReady => (
                "The DeepSeek client failed to initialize, check the server logs",
                None,
            ),
            ChatError::BadRequest(_) => ("Request body must be a JSON object", None),
            ChatError::InvalidMessage => ("Please enter a message", None),
            ChatError::RateLimited {
                max_requests,
                window_secs,
            } => (
                "Too many requests, try again later",
                Some(format!(
                    "limit is {} requests per {} seconds",
                    max_requests, window_secs
                )),
            ),
            ChatError::AuthFailed => ("Authentication with the DeepSeek API failed", None),
            ChatError::ConnectionFailed => ("Could not connect to the DeepSeek API", None),
            ChatError::Timeout => ("The DeepSeek API did not respond in time", None),
            ChatError::Upstream { status, .. } => (
                "The DeepSeek API returned an error",
                Some(format!("upstream status {}", status)),
            ),
            ChatError::Internal(_) => ("Internal server error", None),
        };

        ErrorBody {
            error: self.tag().to_string(),
            message: Some(message.to_string()),
            details,
        }
    }
}

impl From<UpstreamError> for ChatError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Auth => ChatError::AuthFailed,
            UpstreamError::Connection(_) => ChatError::ConnectionFailed,
            UpstreamError::Timeout => ChatError::Timeout,
            UpstreamError::Api { status, message } => ChatError::Upstream { status, message },
            UpstreamError::Malformed(msg) | UpstreamError::Client(msg) => ChatError::Internal(msg),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        ERRORS_TOTAL.with_label_values(&[self.tag()]).inc();
        (self.status(), Json(self.body())).into_response()
    }
}
