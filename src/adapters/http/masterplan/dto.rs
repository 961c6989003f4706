//! HTTP DTOs (Data Transfer Objects) for masterplan endpoints.
//!
//! These types define the JSON request/response structure for the ChatOPT API.
//! They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::domain::{Answers, ApiSpec, BusinessContext, ValidationError};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Business description sent to both endpoints.
///
/// `mission_statement` is optional at the JSON level so that a missing value
/// is reported as a validation failure rather than an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MasterplanRequest {
    #[serde(default)]
    pub mission_statement: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub business_size: Option<String>,
    /// Free-text answers to earlier questions. Ignored by `/ask_questions`.
    #[serde(default)]
    pub answers: Option<String>,
}

impl MasterplanRequest {
    /// Validates the business fields into a domain context.
    pub fn to_context(&self) -> Result<BusinessContext, ValidationError> {
        BusinessContext::new(
            self.mission_statement.as_deref().unwrap_or_default(),
            self.company_name.clone(),
            self.industry.clone(),
            self.business_size.clone(),
        )
    }

    pub fn to_answers(&self) -> Result<Option<Answers>, ValidationError> {
        Answers::parse(self.answers.clone())
    }
}

/// Output format selector.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatQuery {
    /// "json" (default) or "markdown".
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

/// Response body format for the POST endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl FormatQuery {
    /// Parses the `format` parameter. Unknown values are a validation error.
    pub fn output_format(&self) -> Result<OutputFormat, ValidationError> {
        match self.format.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(ValidationError::unsupported(
                "format",
                self.format.clone(),
                "json, markdown",
            )),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterplanResponse {
    pub markdown_content: String,
    pub api_specs: Vec<ApiSpec>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn validation(err: &ValidationError) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: err.to_string(),
            details: Some(serde_json::json!({ "field": err.field() })),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            code: "UPSTREAM_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
