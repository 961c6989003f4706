//! Application layer - Commands and Handlers.
//!
//! This layer turns validated business input into prompts, calls the model
//! through the `AIProvider` port, and shapes the replies.

pub mod handlers;
pub mod prompts;

pub use handlers::{
    GenerateMasterplanCommand, GenerateMasterplanHandler, GenerateQuestionsCommand,
    GenerateQuestionsHandler, GenerateQuestionsResult, OrchestrationError,
};
