//! Application handlers.
//!
//! Command handlers that orchestrate prompt building and model calls.

pub mod masterplan;

pub use masterplan::{
    GenerateMasterplanCommand, GenerateMasterplanHandler, GenerateQuestionsCommand,
    GenerateQuestionsHandler, GenerateQuestionsResult, OrchestrationError,
};
