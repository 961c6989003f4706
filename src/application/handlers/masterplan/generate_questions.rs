//! GenerateQuestionsHandler - Asks the model for clarifying questions.
//!
//! Produces an ordered list of follow-up questions for a business context.
//! Nothing is stored; the caller holds the questions and returns answers later.

use std::sync::Arc;

use crate::application::prompts::questions_prompt;
use crate::domain::{BusinessContext, FollowUpQuestions, QuestionSource};
use crate::ports::{AIProvider, CompletionRequest, RequestMetadata};

use super::OrchestrationError;

/// Command to generate follow-up questions.
#[derive(Debug, Clone)]
pub struct GenerateQuestionsCommand {
    pub context: BusinessContext,
}

/// Result of question generation.
#[derive(Debug, Clone)]
pub struct GenerateQuestionsResult {
    /// Parsed questions, possibly empty.
    pub questions: FollowUpQuestions,
    /// Which parsing stage produced the questions.
    pub source: QuestionSource,
}

/// Handler for generating follow-up questions.
///
/// # Usage
///
/// ```rust,ignore
/// let handler = GenerateQuestionsHandler::new(provider);
/// let result = handler.handle(GenerateQuestionsCommand { context }).await?;
/// ```
pub struct GenerateQuestionsHandler {
    ai_provider: Arc<dyn AIProvider>,
}

impl GenerateQuestionsHandler {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(
        &self,
        cmd: GenerateQuestionsCommand,
    ) -> Result<GenerateQuestionsResult, OrchestrationError> {
        let metadata = RequestMetadata::generate("generate_questions");
        let trace_id = metadata.trace_id.clone();

        let request = CompletionRequest::new(questions_prompt(&cmd.context), metadata);
        let reply = self.ai_provider.complete(request).await?.content;

        let (questions, source) = FollowUpQuestions::parse_reply(&reply);

        match source {
            QuestionSource::RawFallback => tracing::warn!(
                trace_id = %trace_id,
                "Model reply had no recognizable question list; returning it verbatim"
            ),
            _ => tracing::debug!(
                trace_id = %trace_id,
                count = questions.len(),
                source = ?source,
                "Parsed follow-up questions"
            ),
        }

        Ok(GenerateQuestionsResult { questions, source })
    }
}
