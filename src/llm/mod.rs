//! Chat-completion provider boundary.
//!
//! A provider takes an ordered message history plus a system instruction and
//! returns generated text. Credentials are passed to each client constructor.

pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider returned no text")]
    EmptyResponse,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &'static str;

    async fn ask(&self, messages: &[Message], system: &str) -> Result<String, LlmError>;
}

pub(crate) fn require_key(provider: &str, api_key: &str) -> Result<(), LlmError> {
    if api_key.trim().is_empty() {
        return Err(LlmError::Config(format!("{provider} API key is not set")));
    }
    Ok(())
}

pub(crate) fn provider_error(provider: &str, status: reqwest::StatusCode, body: &str) -> LlmError {
    LlmError::Provider(format!("{provider} returned HTTP {status}: {body}"))
}
