//! Vision-Language Provider Abstraction
//!
//! Trait-based abstraction over vision-capable inference providers. One
//! synchronous request/response per call: the extraction pipeline sends a
//! text instruction plus an embedded image and gets the provider's raw
//! JSON response back. No retries, no streaming, no partial results.
//!
//! The raw response body is returned as [`serde_json::Value`] rather than
//! a pre-picked text field so the caller can do its own shape analysis
//! and report *which* top-level fields were actually present when no
//! readable text can be located.

pub mod anthropic;
pub mod mock;

pub use anthropic::AnthropicVision;
pub use mock::MockVision;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while talking to an inference provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// API key not found or invalid
    #[error("API key error: {0}")]
    ApiKey(String),

    /// HTTP transport failure (connect, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Provider returned a non-success status
    #[error("provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body was not the JSON we asked for
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (test harness misconfiguration, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::Serialization(e.to_string())
    }
}

// =============================================================================
// Message Types
// =============================================================================

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Where an embedded image's bytes come from.
///
/// Serializes to the provider's `{"type":"base64",...}` source object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
}

/// Content block within a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content
    Text { text: String },

    /// Embedded image content
    Image { source: ImageSource },
}

impl ContentBlock {
    /// Create a text content block
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Create a base64-embedded image block
    pub fn image(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentBlock::Image {
            source: ImageSource::Base64 {
                media_type: media_type.into(),
                data: data.into(),
            },
        }
    }

    /// Get text content if this is a text block
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Create a user message with explicit content blocks
    pub fn user_with_content(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    /// Get all text from the message, blocks joined without separator
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| c.as_text())
            .collect::<Vec<_>>()
            .join("")
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Default model for vision extraction
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration for a single inference request
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Model identifier
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 1.0)
    pub temperature: Option<f32>,

    /// System prompt
    pub system: Option<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: None,
            system: None,
        }
    }
}

impl VisionConfig {
    /// Create config with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Trait for vision-language inference providers
///
/// Implementations must be thread-safe. One call is one request; callers
/// that want resilience re-invoke the whole pipeline.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Get the provider name (e.g., "Anthropic")
    fn name(&self) -> &str;

    /// Get the current model being used
    fn model(&self) -> &str;

    /// Check if the provider is configured and ready
    fn is_ready(&self) -> bool;

    /// Send messages and return the provider's raw JSON response body
    async fn complete(
        &self,
        messages: &[Message],
        config: Option<&VisionConfig>,
    ) -> Result<Value, ProviderError>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_image_block_wire_shape() {
        let block = ContentBlock::image("image/png", "aGVsbG8=");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["source"]["type"], "base64");
        assert_eq!(json["source"]["media_type"], "image/png");
        assert_eq!(json["source"]["data"], "aGVsbG8=");
    }

    #[test]
    fn test_text_block_wire_shape() {
        let block = ContentBlock::text("Hello");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "Hello");
    }

    #[test]
    fn test_message_text_collects_only_text_blocks() {
        let msg = Message::user_with_content(vec![
            ContentBlock::text("before "),
            ContentBlock::image("image/jpeg", "abcd"),
            ContentBlock::text("after"),
        ]);
        assert_eq!(msg.text(), "before after");
    }

    #[test]
    fn test_config_builder() {
        let config = VisionConfig::with_model("claude-opus-4-20250514")
            .system("You extract receipts")
            .max_tokens(2048)
            .temperature(0.2);

        assert_eq!(config.model, "claude-opus-4-20250514");
        assert_eq!(config.system.as_deref(), Some("You extract receipts"));
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, Some(0.2));
    }
}
