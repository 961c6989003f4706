//! Masterplan orchestration handlers.
//!
//! Each handler formats one prompt, makes one model call through the
//! `AIProvider` port, and shapes the reply. They hold no mutable state and
//! can serve concurrent requests through a shared `Arc`.

mod generate_masterplan;
mod generate_questions;

pub use generate_masterplan::{GenerateMasterplanCommand, GenerateMasterplanHandler};
pub use generate_questions::{
    GenerateQuestionsCommand, GenerateQuestionsHandler, GenerateQuestionsResult,
};

use thiserror::Error;

use crate::ports::AIError;

/// Errors from the orchestration handlers.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// The model call failed or timed out.
    #[error("model call failed: {0}")]
    Upstream(#[from] AIError),

    /// The model answered with no text.
    #[error("model returned an empty masterplan")]
    EmptyMasterplan,
}

impl OrchestrationError {
    /// Returns true if the model did not answer in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, OrchestrationError::Upstream(e) if e.is_timeout())
    }
}
