//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Port for the hosted language model

mod ai_provider;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestMetadata, TokenUsage,
};
