//! Model Client Abstraction
//!
//! Defines the `ModelClient` trait wrapping a single chat-completion call.
//! Each call is stateless; no retries are performed here or anywhere above.
//! Callers may re-invoke, but every call bills against the credential.

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::GenerationOptions;
use crate::types::ModelError;

/// One message in the chat-completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Shared model client for concurrent, independent request handling
pub type SharedModelClient = Arc<dyn ModelClient>;

/// A thin wrapper over one chat-completion endpoint.
///
/// Contract: both text fields non-empty, `options.max_tokens > 0`,
/// `0.0 <= temperature <= 2.0`. On a 2xx with a non-empty completion the
/// generated text is returned; every other outcome is a classified
/// `ModelError`.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Issue one completion request: `[system, user]` message list with the
    /// given options
    async fn complete(
        &self,
        system_text: &str,
        user_text: &str,
        options: &GenerationOptions,
    ) -> std::result::Result<String, ModelError>;

    /// Client name for logging
    fn name(&self) -> &str;
}
