//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHATOPT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use chatopt::config::AppConfig;
//!
//! let config = AppConfig::load_validated().expect("Invalid configuration");
//!
//! println!("Model: {}", config.ai.model);
//! ```

mod ai;
mod error;
mod server;

pub use ai::{backoff_delay, AiConfig, INITIAL_BACKOFF, OPENAI_API_KEY_FALLBACK};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Model provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHATOPT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `OPENAI_API_KEY` when no prefixed key is set
    ///
    /// # Environment Variable Format
    ///
    /// - `CHATOPT__SERVER__PORT=8000` -> `server.port = 8000`
    /// - `CHATOPT__AI__OPENAI_API_KEY=sk-...` -> `ai.openai_api_key = sk-...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHATOPT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config
            .ai
            .apply_key_fallback(std::env::var(OPENAI_API_KEY_FALLBACK).ok());

        Ok(config)
    }

    /// Load and validate in one step, for process startup.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid,
    /// most commonly a missing API key.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;

        // The request deadline must leave room for every model attempt, or
        // callers get a deadline error instead of the upstream one.
        let model_call = self.ai.worst_case_call();
        if self.server.request_timeout() <= model_call {
            return Err(ValidationError::RequestTimeoutTooShort {
                request_secs: self.server.request_timeout_secs,
                model_call_secs: model_call.as_secs(),
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
