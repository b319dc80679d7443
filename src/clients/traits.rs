use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keyphrase::TaggingRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI-style chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference API returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("empty response from {0}")]
    EmptyResponse(&'static str),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            InferenceError::ParseError(err.to_string())
        } else {
            InferenceError::Transport(err.to_string())
        }
    }
}

/// Remote model capabilities the processor relies on
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn summarize(&self, model: &str, text: &str) -> Result<String, InferenceError>;

    async fn classify_tokens(
        &self,
        model: &str,
        text: &str,
    ) -> Result<Vec<TaggingRecord>, InferenceError>;

    async fn chat_completion(&self, request: &ChatRequest) -> Result<String, InferenceError>;
}
