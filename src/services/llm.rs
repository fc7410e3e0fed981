// src/services/llm.rs

//! Language-model client used for change summaries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SummaryConfig;

/// Generates text for a single prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    base_url: String,
    api_version: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(http: Client, api_key: impl Into<String>, config: &SummaryConfig) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            model: config.model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        log::debug!(
            "Requesting summary from {} (model={}, max_tokens={})",
            self.endpoint(),
            self.model,
            max_tokens
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::summarization(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::summarization(format!(
                "API returned {status}: {}",
                body.trim()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::summarization(format!("failed to read response: {e}")))?;
        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::summarization(format!("malformed response: {e}")))?;

        first_text(parsed)
            .ok_or_else(|| AppError::summarization("response contained no text content"))
    }
}

fn first_text(response: MessagesResponse) -> Option<String> {
    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_messages_shape() {
        let request = MessagesRequest {
            model: "test-model",
            max_tokens: 1000,
            messages: vec![RequestMessage {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "test-model",
                "max_tokens": 1000,
                "messages": [{"role": "user", "content": "hello"}]
            })
        );
    }

    #[test]
    fn first_text_skips_non_text_blocks() {
        let response: MessagesResponse = serde_json::from_value(serde_json::json!({
            "id": "msg_1",
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "Summary here"}
            ]
        }))
        .unwrap();
        assert_eq!(first_text(response).as_deref(), Some("Summary here"));
    }

    #[test]
    fn first_text_none_when_empty() {
        let response: MessagesResponse =
            serde_json::from_value(serde_json::json!({"content": []})).unwrap();
        assert!(first_text(response).is_none());
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let mut config = SummaryConfig::default();
        config.api_base_url = "https://llm.example.com/".to_string();
        let client = AnthropicClient::new(Client::new(), "key", &config);
        assert_eq!(client.endpoint(), "https://llm.example.com/v1/messages");
    }
}
