//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat completions (GPT-4 family)

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockError};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
