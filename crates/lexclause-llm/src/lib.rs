//! External classification service: a prompt goes in, raw model text comes out.
//!
//! The pipeline only depends on [`CompletionClient`]. The OpenAI implementation
//! lives behind the `openai` feature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "openai")]
mod openai;
#[cfg(feature = "openai")]
pub use openai::OpenAiClient;

#[derive(Error, Debug)]
pub enum LlmError {
    #[cfg(feature = "openai")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("service returned no completion content")]
    EmptyResponse,
}

/// A single chat-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the service to constrain output to a JSON object.
    pub json_mode: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Raw text returned by the service plus bookkeeping for logs.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub id: Option<String>,
    pub model: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: None,
            model: None,
            usage: None,
        }
    }
}

/// Black-box model call. Failures (network, auth, quota) are returned as-is;
/// callers do not retry.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;
}
