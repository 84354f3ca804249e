//! Remote chat-completion invocation.
//!
//! - [`types`]: OpenAI-compatible wire types
//! - [`client`]: Groq HTTP client
//!
//! The HTTP layer only sees the [`ChatCompletion`] trait, so handlers can be
//! exercised against a stub without a network.

pub mod client;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::GroqClient;
pub use types::{ChatMessage, Role};

/// Error type for completion calls.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("GROQ_API_KEY is not configured")]
    MissingApiKey,

    #[error("request to completion API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode completion response: {0}")]
    Decode(String),

    #[error("completion API returned no content")]
    EmptyCompletion,
}

/// One completion call: a system prompt plus a single user turn.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl ChatRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::new(Role::System, &self.system_prompt),
            ChatMessage::new(Role::User, &self.user_prompt),
        ]
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Run the request and return the first choice's text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError>;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;
}
