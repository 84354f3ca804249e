//! Groq chat-completion client.
//!
//! Sends one non-streaming `POST {base_url}/chat/completions` per call and
//! returns the first choice's content. No retries are attempted.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use super::{ChatCompletion, ChatRequest, CompletionError};
use crate::config::CompletionConfig;

/// HTTP client for Groq's OpenAI-compatible API.
pub struct GroqClient {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f64,
    api_key: Option<String>,
}

impl GroqClient {
    /// Build a client. A missing API key is not an error here; calls fail instead.
    pub fn new(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: request.messages(),
            temperature: self.temperature,
        };

        debug!(
            model = %self.model,
            prompt_len = request.user_prompt.len(),
            "Sending chat completion request"
        );

        let started = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Completion API returned an error status");
            return Err(CompletionError::Status { status, body });
        }

        let text = response.text().await?;
        let completion: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| CompletionError::Decode(e.to_string()))?;

        debug!(
            id = completion.id.as_deref().unwrap_or("-"),
            choices = completion.choices.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Chat completion received"
        );

        completion
            .first_content()
            .map(str::to_string)
            .ok_or(CompletionError::EmptyCompletion)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
