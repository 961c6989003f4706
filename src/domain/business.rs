//! Business context and follow-up answers supplied by the caller.
//!
//! Both are validated value objects: once constructed, the mission statement
//! is known to be non-blank and every field is trimmed and within bounds.

use super::errors::ValidationError;

/// Maximum characters accepted in a mission statement.
pub const MAX_MISSION_CHARS: usize = 10_000;
/// Maximum characters accepted in each optional metadata field.
pub const MAX_FIELD_CHARS: usize = 200;
/// Maximum characters accepted in the answers text.
pub const MAX_ANSWERS_CHARS: usize = 20_000;

/// Placeholder rendered into prompts for absent metadata.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Description of the company and mission being analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessContext {
    mission_statement: String,
    company_name: Option<String>,
    industry: Option<String>,
    business_size: Option<String>,
}

impl BusinessContext {
    /// Builds a context from raw caller input.
    ///
    /// Blank optional fields are treated as absent.
    pub fn new(
        mission_statement: impl AsRef<str>,
        company_name: Option<String>,
        industry: Option<String>,
        business_size: Option<String>,
    ) -> Result<Self, ValidationError> {
        let mission = mission_statement.as_ref().trim();
        if mission.is_empty() {
            return Err(ValidationError::empty_field("mission_statement"));
        }
        check_length("mission_statement", mission, MAX_MISSION_CHARS)?;

        Ok(Self {
            mission_statement: mission.to_string(),
            company_name: optional_field("company_name", company_name)?,
            industry: optional_field("industry", industry)?,
            business_size: optional_field("business_size", business_size)?,
        })
    }

    /// Shorthand for a context with only a mission statement.
    pub fn from_mission(mission_statement: impl AsRef<str>) -> Result<Self, ValidationError> {
        Self::new(mission_statement, None, None, None)
    }

    pub fn mission_statement(&self) -> &str {
        &self.mission_statement
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref()
    }

    pub fn business_size(&self) -> Option<&str> {
        self.business_size.as_deref()
    }
}

/// The caller's free-text answers to previously generated questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers(String);

impl Answers {
    /// Parses optional answers; blank text yields `None`.
    pub fn parse(raw: Option<String>) -> Result<Option<Self>, ValidationError> {
        Ok(optional_field_with_limit("answers", raw, MAX_ANSWERS_CHARS)?.map(Answers))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Renders an optional field for prompt templates.
pub fn or_not_specified(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_SPECIFIED)
}

fn optional_field(
    field: &'static str,
    raw: Option<String>,
) -> Result<Option<String>, ValidationError> {
    optional_field_with_limit(field, raw, MAX_FIELD_CHARS)
}

fn optional_field_with_limit(
    field: &'static str,
    raw: Option<String>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            check_length(field, value, max)?;
            Ok(Some(value.to_string()))
        }
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let chars = value.chars().count();
    if chars > max {
        return Err(ValidationError::too_long(field, max, chars));
    }
    Ok(())
}
