//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has unsupported value '{value}' (expected one of: {expected})")]
    Unsupported {
        field: String,
        value: String,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a too long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an unsupported value validation error.
    pub fn unsupported(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        ValidationError::Unsupported {
            field: field.into(),
            value: value.into(),
            expected,
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::Unsupported { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("mission_statement");
        assert_eq!(
            format!("{}", err),
            "Field 'mission_statement' cannot be empty"
        );
        assert_eq!(err.field(), "mission_statement");
    }

    #[test]
    fn validation_error_too_long_displays_correctly() {
        let err = ValidationError::too_long("industry", 200, 250);
        assert_eq!(
            format!("{}", err),
            "Field 'industry' must be at most 200 characters, got 250"
        );
        assert_eq!(err.field(), "industry");
    }

    #[test]
    fn validation_error_unsupported_displays_correctly() {
        let err = ValidationError::unsupported("format", "xml", "json, markdown");
        assert_eq!(
            format!("{}", err),
            "Field 'format' has unsupported value 'xml' (expected one of: json, markdown)"
        );
        assert_eq!(err.field(), "format");
    }
}
