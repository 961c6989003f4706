//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid AI base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Model name cannot be empty")]
    EmptyModel,

    #[error("Temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("top_p must be in (0.0, 1.0], got {0}")]
    InvalidTopP(f32),

    #[error("Retry count exceeds maximum allowed (5)")]
    TooManyRetries,

    #[error(
        "Request timeout ({request_secs}s) must exceed the worst-case model call ({model_call_secs}s = timeout x attempts + backoff)"
    )]
    RequestTimeoutTooShort {
        request_secs: u64,
        model_call_secs: u64,
    },
}
