//! External data provider abstractions
//!
//! Every outbound call goes through one of two seams: [`JsonFetcher`] for the
//! metadata and poster APIs (GET with query parameters, JSON back) and
//! [`CompletionProvider`] for the language model. Services depend on the traits,
//! which keeps them testable without a network.

use serde::Serialize;

use crate::error::AppResult;

pub mod groq;
pub mod http;

pub use groq::GroqProvider;
pub use http::HttpFetcher;

/// GET-with-query transport returning decoded JSON
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetch `url` with the given query parameters.
    ///
    /// Timeouts surface as `AppError::Timeout`, non-success statuses as
    /// `AppError::ExternalApi`.
    async fn get_json(
        &self,
        url: &str,
        query: Vec<(String, String)>,
    ) -> AppResult<serde_json::Value>;
}

/// Role of a message sent to the language model
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Sampling settings shared by every completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(settings: &CompletionSettings, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: settings.model.clone(),
            messages,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// Chat completion endpoint of a hosted language model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the text of the first completion choice
    async fn complete(&self, request: CompletionRequest) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
