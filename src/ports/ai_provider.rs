//! AI Provider Port - Interface for the hosted language model.
//!
//! The orchestrator only ever needs "send this prompt, give me the text back".
//! This port keeps that seam narrow so handlers can be exercised against a
//! scripted stand-in instead of a real network call.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl AIProvider for Echo {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse::text(request.prompt, "echo"))
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for language model interactions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Sends one prompt and returns the model's reply.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// A single-turn prompt. Sampling settings belong to the provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The full prompt, sent as one user message.
    pub prompt: String,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, metadata: RequestMetadata) -> Self {
        Self {
            prompt: prompt.into(),
            metadata,
        }
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Which orchestrator operation issued the request.
    pub operation: &'static str,
    /// Trace ID correlating logs for one model call.
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(operation: &'static str, trace_id: impl Into<String>) -> Self {
        Self {
            operation,
            trace_id: trace_id.into(),
        }
    }

    /// Metadata with a fresh random trace ID.
    pub fn generate(operation: &'static str) -> Self {
        Self::new(operation, uuid::Uuid::new_v4().to_string())
    }
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content.
    pub content: String,
    /// Token usage.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped generating.
    pub finish_reason: FinishReason,
}

impl CompletionResponse {
    /// True when the model stopped at its token limit.
    pub fn is_truncated(&self) -> bool {
        self.finish_reason == FinishReason::Length
    }

    /// A plain completion with no usage information.
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
            model: model.into(),
            finish_reason: FinishReason::Stop,
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
///
/// A filtered completion never gets this far; it is `AIError::ContentFiltered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit the model's token limit; the reply is cut off.
    Length,
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai").
    pub name: String,
    /// Model identifier (e.g., "gpt-4").
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Prompt exceeds the model's context window.
    #[error("context too long: {0}")]
    ContextTooLong(String),

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }

    /// Returns true if the provider did not answer in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AIError::Timeout { .. })
    }
}
