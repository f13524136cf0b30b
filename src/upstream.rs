use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::Args;
use crate::models::{ChatResponse, CompletionRequest, CompletionResponse, Message, ModelList};

pub const SYSTEM_PROMPT: &str = "You are a helpful and friendly AI assistant.";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("authentication failed")]
    Auth,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("request timed out")]
    Timeout,
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("http client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_connect() {
            UpstreamError::Connection(err.to_string())
        } else if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else {
            UpstreamError::Client(err.to_string())
        }
    }
}

/// Shared handle to the DeepSeek completion API.
pub struct DeepSeekClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
}

impl DeepSeekClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: "deepseek-chat".to_string(),
            temperature: 0.7,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // Connectivity check: list models with the configured key
    pub async fn list_models(&self) -> Result<Vec<String>, UpstreamError> {
        let res = self
            .http
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let res = check_status(res).await?;
        let list: ModelList = res.json().await?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    /// Single non-streaming completion: system preamble plus one user turn.
    pub async fn chat(&self, user_message: &str) -> Result<ChatResponse, UpstreamError> {
        let request = self.completion_request(user_message);
        let res = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let res = check_status(res).await?;
        let body: CompletionResponse = res.json().await?;

        let reply = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::Malformed("response has no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| UpstreamError::Malformed("choice has no content".to_string()))?;

        Ok(ChatResponse {
            reply,
            model: body.model,
            usage: body.usage.map(Into::into).unwrap_or_default(),
        })
    }

    fn completion_request<'a>(&'a self, user_message: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: user_message,
                },
            ],
            stream: false,
            temperature: self.temperature,
        }
    }
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(UpstreamError::Auth);
    }
    let message = res.text().await.unwrap_or_default();
    Err(UpstreamError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Builds the startup client. `None` when the key is missing, the HTTP
/// client cannot be built or the connectivity check fails.
pub async fn connect(args: &Args) -> Option<DeepSeekClient> {
    let Some(api_key) = args.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
        error!("DEEPSEEK_API_KEY is not set, chat is disabled");
        return None;
    };

    let client = match DeepSeekClient::new(api_key, &args.base_url, args.upstream_timeout()) {
        Ok(c) => c
            .with_model(args.model.clone())
            .with_temperature(args.temperature),
        Err(e) => {
            error!(error = %e, "failed to build DeepSeek client");
            return None;
        }
    };

    match client.list_models().await {
        Ok(models) => {
            info!(base_url = %client.base_url(), ?models, "DeepSeek client initialized");
            Some(client)
        }
        Err(e) => {
            error!(base_url = %client.base_url(), error = %e, "DeepSeek connectivity check failed");
            None
        }
    }
}
