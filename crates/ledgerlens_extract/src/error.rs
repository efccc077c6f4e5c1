//! Extraction error taxonomy
//!
//! Every failure is terminal for the call - nothing is retried here. The
//! variants carry just enough for diagnosis without echoing untrusted
//! payloads: [`ExtractError::EmptyModelOutput`] names only top-level field
//! names, and [`ExtractError::MalformedJson`] carries a bounded prefix of
//! the offending text, never the full body.

use ledgerlens_vision::ProviderError;
use thiserror::Error;

/// Error type for extraction operations
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Bad or missing image payload / malformed request
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing or unusable provider credential
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Non-success or transport failure from the inference provider.
    /// `status` is 0 when the failure happened below HTTP (connect,
    /// timeout, unreadable body).
    #[error("upstream inference failure (status {status}): {body}")]
    Upstream { status: u16, body: String },

    /// No readable text located in the provider's response
    #[error("no readable text in model output (top-level fields: {})", .fields.join(", "))]
    EmptyModelOutput { fields: Vec<String> },

    /// Text located but it is not valid JSON
    #[error("model output is not valid JSON: {prefix}")]
    MalformedJson { prefix: String },

    /// Text parsed as JSON but the value is not an object
    #[error("model output is not a JSON object")]
    InvalidDraftShape,
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

impl From<ProviderError> for ExtractError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::ApiKey(msg) => ExtractError::Configuration(msg),
            ProviderError::Api { status, body } => ExtractError::Upstream { status, body },
            ProviderError::Http(msg)
            | ProviderError::Serialization(msg)
            | ProviderError::Internal(msg) => ExtractError::Upstream {
                status: 0,
                body: msg,
            },
        }
    }
}
