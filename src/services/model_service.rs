use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::ModelConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Api(String),

    #[error("model request timed out after {0}s")]
    Timeout(u64),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("no model configured")]
    NoModelConfigured,
}

/// Sends one prompt to a text-generation backend and returns its reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiModelClient {
    client: Client<OpenAIConfig>,
    models: Vec<String>,
    timeout: Duration,
}

impl OpenAiModelClient {
    pub fn new(config: &ModelConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.api_base);

        Self {
            client: Client::with_config(openai_config),
            models: config.candidate_models(),
            timeout: config.timeout,
        }
    }

    async fn complete_with(&self, model: &str, prompt: &str) -> Result<String, ModelError> {
        let request = json!({
            "model": model,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let chat = self.client.chat();
        let call = chat.create_byot::<Value, Value>(request);
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ModelError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| ModelError::Api(e.to_string()))?;

        reply_text(&response)
    }
}

#[async_trait]
impl ModelClient for OpenAiModelClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let mut last_error = ModelError::NoModelConfigured;

        for model in &self.models {
            match self.complete_with(model, prompt).await {
                Ok(text) => {
                    log::debug!("Model '{}' answered with {} chars", model, text.len());
                    return Ok(text);
                }
                Err(err) => {
                    log::warn!("Model '{}' failed, trying next candidate: {}", model, err);
                    last_error = err;
                }
            }
        }

        Err(last_error)
    }
}

/// Pulls `choices[0].message.content` out of a chat-completions response.
fn reply_text(response: &Value) -> Result<String, ModelError> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(ModelError::EmptyResponse)
}
