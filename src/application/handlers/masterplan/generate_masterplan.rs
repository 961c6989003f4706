//! GenerateMasterplanHandler - Asks the model for the API masterplan.
//!
//! The markdown is returned exactly as the model wrote it. API specs are read
//! from the JSON array the prompt asks for; if that array is missing or broken
//! the plan is still returned, just without structured specs.

use std::sync::Arc;

use crate::application::prompts::masterplan_prompt;
use crate::domain::{extract_api_specs, Answers, BusinessContext, MasterplanDocument};
use crate::ports::{AIProvider, CompletionRequest, RequestMetadata};

use super::OrchestrationError;

/// Command to generate a masterplan.
#[derive(Debug, Clone)]
pub struct GenerateMasterplanCommand {
    pub context: BusinessContext,
    /// Answers to previously generated questions.
    pub answers: Option<Answers>,
}

/// Handler for generating masterplan documents.
pub struct GenerateMasterplanHandler {
    ai_provider: Arc<dyn AIProvider>,
}

impl GenerateMasterplanHandler {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(
        &self,
        cmd: GenerateMasterplanCommand,
    ) -> Result<MasterplanDocument, OrchestrationError> {
        let metadata = RequestMetadata::generate("generate_masterplan");
        let trace_id = metadata.trace_id.clone();

        let request = CompletionRequest::new(
            masterplan_prompt(&cmd.context, cmd.answers.as_ref()),
            metadata,
        );
        let completion = self.ai_provider.complete(request).await?;

        if completion.content.trim().is_empty() {
            return Err(OrchestrationError::EmptyMasterplan);
        }
        // Still returned: a cut-off plan is more useful than none.
        if completion.is_truncated() {
            tracing::warn!(
                trace_id = %trace_id,
                completion_tokens = completion.usage.completion_tokens,
                "Masterplan was cut off at the model's token limit"
            );
        }
        let reply = completion.content;

        let api_specs = match extract_api_specs(&reply) {
            Ok(specs) => specs,
            Err(e) => {
                tracing::warn!(trace_id = %trace_id, "Could not read API specs from masterplan: {}", e);
                Vec::new()
            }
        };

        let document = MasterplanDocument::new(reply, api_specs);
        if !document.has_section_headers() {
            tracing::warn!(trace_id = %trace_id, "Masterplan has no markdown section headers");
        }

        tracing::debug!(
            trace_id = %trace_id,
            chars = document.markdown().len(),
            api_specs = document.api_specs().len(),
            "Generated masterplan"
        );

        Ok(document)
    }
}
