//! Groq chat completion provider (OpenAI-compatible API)

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::providers::{CompletionProvider, CompletionRequest},
};

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct GroqProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl GroqProvider {
    pub fn new(api_key: Option<String>, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_url,
        })
    }

    fn extract_content(response: CompletionResponse) -> AppResult<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Model("Completion response had no content".to_string()))
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GroqProvider {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::MissingConfiguration("GROQ_API_KEY".to_string()))?;

        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(url.clone())
                } else {
                    AppError::HttpClient(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Model(format!(
                "Groq API returned status {}: {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response.json().await?;
        let content = Self::extract_content(completion)?;

        tracing::info!(
            model = %request.model,
            chars = content.len(),
            provider = "groq",
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{ChatMessage, CompletionSettings};

    #[test]
    fn test_extract_first_choice() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Inception\nThe Matrix"}}
            ]
        }"#;
        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        let content = GroqProvider::extract_content(response).unwrap();
        assert_eq!(content, "Inception\nThe Matrix");
    }

    #[test]
    fn test_extract_without_choices_is_error() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            GroqProvider::extract_content(response),
            Err(AppError::Model(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest::new(
            &CompletionSettings::default(),
            vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
        );
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let provider = GroqProvider::new(
            Some("  ".to_string()),
            "http://test.local".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        let request = CompletionRequest::new(&CompletionSettings::default(), vec![]);
        let result = provider.complete(request).await;
        assert!(matches!(result, Err(AppError::MissingConfiguration(_))));
    }
}
