//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, including replies cut off at the token limit
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("[\"Who are your customers?\"]")
//!     .with_delay(Duration::from_millis(100));
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Mock AI provider for testing.
///
/// Configurable to return specific responses, simulate delays, or inject errors.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

#[derive(Debug, Clone)]
enum MockResponse {
    Success {
        content: String,
        finish_reason: FinishReason,
    },
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u64 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.responses).push_back(MockResponse::Success {
            content: content.into(),
            finish_reason: FinishReason::Stop,
        });
        self
    }

    /// Adds a reply that stopped at the token limit.
    pub fn with_truncated_response(self, content: impl Into<String>) -> Self {
        lock(&self.responses).push_back(MockResponse::Success {
            content: content.into(),
            finish_reason: FinishReason::Length,
        });
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    /// Returns the prompt of the most recent call.
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.calls).last().map(|req| req.prompt.clone())
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                content: "Mock response".to_string(),
                finish_reason: FinishReason::Stop,
            })
    }
}

// A poisoned lock only means another test thread panicked; the data is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success {
                content,
                finish_reason,
            } => Ok(CompletionResponse {
                content,
                usage: TokenUsage::new(10, 20),
                model: self.info.model.clone(),
                finish_reason,
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RequestMetadata;

    fn test_request() -> CompletionRequest {
        CompletionRequest::new("Hello", RequestMetadata::new("test", "trace-123"))
    }

    #[tokio::test]
    async fn mock_provider_returns_configured_response() {
        let provider = MockAIProvider::new().with_response("Hello from mock!");

        let response = provider.complete(test_request()).await.unwrap();

        assert_eq!(response.content, "Hello from mock!");
        assert_eq!(response.model, "mock-model-1");
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn mock_provider_returns_responses_in_order() {
        let provider = MockAIProvider::new()
            .with_response("First")
            .with_response("Second");

        assert_eq!(provider.complete(test_request()).await.unwrap().content, "First");
        assert_eq!(provider.complete(test_request()).await.unwrap().content, "Second");
        assert_eq!(
            provider.complete(test_request()).await.unwrap().content,
            "Mock response"
        );
    }

    #[tokio::test]
    async fn mock_provider_injects_errors() {
        let provider = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 5 });

        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn mock_provider_tracks_calls() {
        let provider = MockAIProvider::new();
        assert_eq!(provider.call_count(), 0);
        assert_eq!(provider.last_prompt(), None);

        provider.complete(test_request()).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.get_calls()[0].metadata.trace_id, "trace-123");
        assert_eq!(provider.last_prompt().as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn truncated_response_reports_length_finish() {
        let provider = MockAIProvider::new().with_truncated_response("cut o");

        let response = provider.complete(test_request()).await.unwrap();

        assert_eq!(response.content, "cut o");
        assert!(response.is_truncated());
    }

    #[tokio::test]
    async fn delay_is_applied_before_replying() {
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(30));

        let started = std::time::Instant::now();
        provider.complete(test_request()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let provider = MockAIProvider::new().with_response("shared");
        let clone = provider.clone();

        clone.complete(test_request()).await.unwrap();
        assert_eq!(provider.call_count(), 1);
    }
}
