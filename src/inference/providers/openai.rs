//! OpenAI provider using the Chat Completions API.
//!
//! Works with any server that speaks `POST {base_url}/chat/completions`
//! (OpenAI itself, LM Studio, vLLM, ...). One blocking round trip per
//! prompt: no streaming, no history, no retry.

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::core::config::{ConfigError, CredentialSource, DEFAULT_OPENAI_BASE_URL};
use crate::inference::types::{ApiErrorBody, ChatRequest, ChatResponse};
use crate::inference::{CompletionClient, CompletionError};

pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider. Fails if `credentials` has no key.
    ///
    /// # Arguments
    /// * `credentials` - Source of the API key, asked exactly once
    /// * `model` - Model identifier sent with every request
    /// * `base_url` - Optional custom base URL (defaults to OpenAI's API)
    pub fn new(
        credentials: &dyn CredentialSource,
        model: String,
        base_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = credentials.get_api_key()?;
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            api_key,
            base_url,
            model,
            client: reqwest::Client::new(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest::single_turn(&self.model, prompt);
        info!(
            "Chat completion request: model={}, prompt_len={}",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Completion request failed to send: {e}");
                CompletionError::UnknownError(e.to_string())
            })?;

        let status = response.status();
        debug!("Completion response status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Completion API error: {} - {}", status.as_u16(), body);
            return Err(CompletionError::from_status(
                status.as_u16(),
                ApiErrorBody::message_from(&body),
            ));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            warn!("Failed to decode completion response: {e}");
            CompletionError::UnknownError(format!("invalid response body: {e}"))
        })?;

        let text = body
            .first_text()
            .ok_or_else(|| CompletionError::UnknownError("no valid response from API".to_string()))?;
        info!("Chat completion received: {} chars", text.chars().count());
        Ok(text)
    }
}
