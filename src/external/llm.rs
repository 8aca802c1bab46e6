use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::Embedding;
use crate::external::error::ExternalError;

pub type LlmResult<T> = Result<T, ExternalError>;

/// Uniform interface over LLM backends: one-shot completion, chat with
/// history, embeddings, and provider-side web search.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One-shot instruction completion.
    async fn complete(&self, instructions: &str, prompt: &str) -> LlmResult<String>;

    /// Chat completion. Backends that support it keep the conversation
    /// history across calls.
    async fn chat(&self, instructions: &str, prompt: &str) -> LlmResult<String>;

    /// Generate one embedding per input text.
    async fn embed(&self, inputs: &[String]) -> LlmResult<Vec<Embedding>>;

    /// Provider-side web search returning a text summary.
    async fn web_search(&self, query: &str) -> LlmResult<String>;
}

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}
