//! Mock provider for deterministic testing
//!
//! Provides canned JSON responses without network calls. Responses are
//! queued and consumed in order; an empty queue is an error so test
//! configuration mistakes surface immediately instead of hanging.

use super::{Message, ProviderError, VisionConfig, VisionProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type CannedResult = Result<Value, ProviderError>;

/// Mock vision provider with deterministic responses
#[derive(Clone, Default)]
pub struct MockVision {
    /// Queue of responses to return
    responses: Arc<Mutex<VecDeque<CannedResult>>>,
    /// Record of message sets received (for assertions)
    received: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockVision {
    /// Create a new mock provider with an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful raw response body
    pub fn queue_response(&self, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    /// Queue a provider failure
    pub fn queue_error(&self, error: ProviderError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// All message sets this provider has received
    pub fn received_messages(&self) -> Vec<Vec<Message>> {
        self.received.lock().unwrap().clone()
    }

    /// Number of completed calls
    pub fn call_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    /// Responses still queued
    pub fn responses_remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl VisionProvider for MockVision {
    fn name(&self) -> &str {
        "Mock"
    }

    fn model(&self) -> &str {
        "mock-test-model"
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        messages: &[Message],
        _config: Option<&VisionConfig>,
    ) -> Result<Value, ProviderError> {
        self.received.lock().unwrap().push(messages.to_vec());

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ProviderError::Internal(
                    "mock provider has no canned response queued".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_responses_consumed_in_order() {
        let mock = MockVision::new();
        mock.queue_response(json!({"output_text": "first"}));
        mock.queue_response(json!({"output_text": "second"}));

        let first = mock.complete(&[Message::user("a")], None).await.unwrap();
        let second = mock.complete(&[Message::user("b")], None).await.unwrap();

        assert_eq!(first["output_text"], "first");
        assert_eq!(second["output_text"], "second");
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.responses_remaining(), 0);
    }

    #[tokio::test]
    async fn test_empty_queue_is_an_error() {
        let mock = MockVision::new();
        let err = mock.complete(&[Message::user("a")], None).await.unwrap_err();
        assert!(matches!(err, ProviderError::Internal(_)));
    }

    #[tokio::test]
    async fn test_records_received_messages() {
        let mock = MockVision::new();
        mock.queue_response(json!({}));
        mock.complete(&[Message::user("what was spent?")], None)
            .await
            .unwrap();

        let received = mock.received_messages();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0][0].text(), "what was spent?");
    }

    #[tokio::test]
    async fn test_queued_error_is_returned() {
        let mock = MockVision::new();
        mock.queue_error(ProviderError::Api {
            status: 529,
            body: "overloaded".to_string(),
        });

        let err = mock.complete(&[Message::user("a")], None).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 529, .. }));
    }
}
