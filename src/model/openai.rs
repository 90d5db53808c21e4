//! OpenAI Chat Completions Client
//!
//! Single-call client with secure credential handling and an explicit
//! request timeout. Failures are classified into the gateway taxonomy;
//! the credential never appears in logs, Debug output, or error messages.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{ChatMessage, ModelClient};
use crate::catalog::GenerationOptions;
use crate::constants::model as defaults;
use crate::types::{ErrorClassifier, ModelError, PreppyError, Result};

/// Chat-completion client for the OpenAI API (or a compatible endpoint)
pub struct OpenAiClient {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(api_key: SecretString, api_base: Option<String>, timeout: Duration) -> Result<Self> {
        let api_base = api_base.unwrap_or_else(|| defaults::DEFAULT_API_BASE.to_string());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PreppyError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base,
            client,
        })
    }

    /// Build from the server-side environment credential. `None` when the
    /// credential is absent so the server can degrade gracefully instead of
    /// refusing to start.
    pub fn from_env(api_base: Option<String>, timeout: Duration) -> Result<Option<Self>> {
        match std::env::var(defaults::CREDENTIAL_ENV) {
            Ok(key) if !key.trim().is_empty() => {
                let client = Self::new(SecretString::from(key), api_base, timeout)?;
                Ok(Some(client))
            }
            _ => {
                warn!(
                    "{} not set. AI generation endpoints will report a configuration error.",
                    defaults::CREDENTIAL_ENV
                );
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(
        &self,
        system_text: &str,
        user_text: &str,
        options: &GenerationOptions,
    ) -> std::result::Result<String, ModelError> {
        info!(
            model = %options.model,
            max_tokens = options.max_tokens,
            "Sending chat completion request"
        );
        let start = Instant::now();

        let request = ChatCompletionRequest {
            model: options.model.clone(),
            messages: vec![
                ChatMessage::system(system_text),
                ChatMessage::user(user_text),
            ],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ErrorClassifier::classify_http(status.as_u16(), &body);
            warn!(status = status.as_u16(), kind = %err.kind, "Chat completion failed");
            return Err(err);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::upstream(format!("Failed to parse completion response: {}", e)))?;

        let content = body
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ModelError::upstream("Empty completion in response"))?;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Received completion"
        );
        Ok(content.to_string())
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
