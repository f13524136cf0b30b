use serde::{Deserialize, Serialize};

// Gateway response for a successful chat turn
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChatResponse {
    pub reply: String,
    pub model: String,
    pub usage: Usage,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

// Upstream chat completion request (OpenAI format)
#[derive(Debug, Serialize, Clone)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<Message<'a>>,
    pub stream: bool,
    pub temperature: f64,
}

#[derive(Debug, Serialize, Clone)]
pub struct Message<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

// Upstream chat completion response, only the fields the gateway relays
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl From<CompletionUsage> for Usage {
    fn from(usage: CompletionUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        }
    }
}

// GET /models listing, used for the startup connectivity check
#[derive(Debug, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    pub id: String,
}
