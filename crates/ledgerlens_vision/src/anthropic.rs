//! Anthropic Provider Implementation
//!
//! Implements the [`VisionProvider`] trait for Anthropic's Messages API.
//! Non-streaming: the extraction pipeline needs exactly one complete JSON
//! answer per receipt, so the request is a plain POST and the whole
//! response body is returned to the caller for shape analysis.
//!
//! # Configuration
//!
//! - API key: `ANTHROPIC_API_KEY` environment variable or passed directly
//! - Model: defaults to [`DEFAULT_MODEL`](crate::DEFAULT_MODEL),
//!   configurable via [`AnthropicVision::with_model`]

use super::{Message, ProviderError, VisionConfig, VisionProvider, DEFAULT_MODEL};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Anthropic API base URL
const API_BASE_URL: &str = "https://api.anthropic.com/v1";

/// API version header
const API_VERSION: &str = "2023-06-01";

/// Bound on the single outbound round trip. The reference behavior left
/// this to the transport default; here the bound is explicit and a timeout
/// surfaces as an upstream error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Request body for the Messages API
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Anthropic Messages API provider
pub struct AnthropicVision {
    /// HTTP client
    client: Client,
    /// API key
    api_key: String,
    /// Default model
    model: String,
}

impl AnthropicVision {
    /// Create a new provider with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create a new provider from the environment
    ///
    /// Reads `ANTHROPIC_API_KEY`. The error message never contains the
    /// key's value.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            ProviderError::ApiKey(
                "ANTHROPIC_API_KEY environment variable not set".to_string(),
            )
        })?;

        if api_key.is_empty() {
            return Err(ProviderError::ApiKey(
                "ANTHROPIC_API_KEY is empty".to_string(),
            ));
        }

        Ok(Self::new(api_key))
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [Message],
        config: Option<&'a VisionConfig>,
    ) -> MessagesRequest<'a> {
        match config {
            Some(config) => MessagesRequest {
                model: &config.model,
                max_tokens: config.max_tokens,
                system: config.system.as_deref(),
                messages,
                temperature: config.temperature,
            },
            None => MessagesRequest {
                model: &self.model,
                max_tokens: 1024,
                system: None,
                messages,
                temperature: None,
            },
        }
    }
}

#[async_trait]
impl VisionProvider for AnthropicVision {
    fn name(&self) -> &str {
        "Anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn complete(
        &self,
        messages: &[Message],
        config: Option<&VisionConfig>,
    ) -> Result<Value, ProviderError> {
        let request = self.build_request(messages, config);

        tracing::debug!(model = request.model, "sending inference request");

        let response = self
            .client
            .post(format!("{}/messages", API_BASE_URL))
            .timeout(REQUEST_TIMEOUT)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentBlock;

    #[test]
    fn test_provider_creation() {
        let provider = AnthropicVision::new("test-key");
        assert_eq!(provider.name(), "Anthropic");
        assert_eq!(provider.model(), DEFAULT_MODEL);
        assert!(provider.is_ready());
    }

    #[test]
    fn test_empty_key_not_ready() {
        let provider = AnthropicVision::new("");
        assert!(!provider.is_ready());
    }

    #[test]
    fn test_provider_with_model() {
        let provider = AnthropicVision::new("test-key").with_model("claude-opus-4-20250514");
        assert_eq!(provider.model(), "claude-opus-4-20250514");
    }

    #[test]
    fn test_build_request_uses_config() {
        let provider = AnthropicVision::new("test-key");
        let messages = vec![Message::user("Hello")];
        let config = VisionConfig::with_model("claude-opus-4-20250514")
            .system("You extract receipts")
            .max_tokens(2048);

        let request = provider.build_request(&messages, Some(&config));
        assert_eq!(request.model, "claude-opus-4-20250514");
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.system, Some("You extract receipts"));
    }

    #[test]
    fn test_request_body_wire_shape() {
        let provider = AnthropicVision::new("test-key");
        let messages = vec![Message::user_with_content(vec![
            ContentBlock::text("read this receipt"),
            ContentBlock::image("image/png", "aGVsbG8="),
        ])];
        let config = VisionConfig::default().system("system prompt");

        let request = provider.build_request(&messages, Some(&config));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["system"], "system prompt");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["type"], "image");
        assert_eq!(
            json["messages"][0]["content"][1]["source"]["media_type"],
            "image/png"
        );
        // Unset temperature is omitted entirely
        assert!(json.get("temperature").is_none());
    }
}
