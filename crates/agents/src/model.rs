use {async_trait::async_trait, serde::Serialize};

use crate::Result;

/// A single chat turn sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System { content: String },
    User { content: String },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }
}

/// Single-shot text completion.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Model identifier (e.g. "gpt-4o-mini").
    fn id(&self) -> &str;

    /// Run one completion and return the assistant text, trimmed.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}
