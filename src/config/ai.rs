//! AI provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Environment variable read when the prefixed key is absent.
pub const OPENAI_API_KEY_FALLBACK: &str = "OPENAI_API_KEY";

/// Delay before the first retry of a failed model call.
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Delay before retry number `retry` (0-based). Doubles each time, capped at 32x.
pub fn backoff_delay(initial: Duration, retry: u32) -> Duration {
    initial * (1u32 << retry.min(5))
}

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<SecretString>,

    /// Chat model used for both prompts
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the chat completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Longest a single model call can take: every attempt timing out plus
    /// the backoff between attempts.
    pub fn worst_case_call(&self) -> Duration {
        let attempts = self.timeout() * (self.max_retries + 1);
        let backoff: Duration = (0..self.max_retries)
            .map(|retry| backoff_delay(INITIAL_BACKOFF, retry))
            .sum();
        attempts + backoff
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Fills in the API key from `OPENAI_API_KEY` when no prefixed key was set.
    pub fn apply_key_fallback(&mut self, fallback: Option<String>) {
        if self.has_openai() {
            return;
        }
        if let Some(key) = fallback.filter(|k| !k.trim().is_empty()) {
            self.openai_api_key = Some(SecretString::new(key));
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() {
            return Err(ValidationError::MissingRequired(
                "CHATOPT__AI__OPENAI_API_KEY (or OPENAI_API_KEY)",
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::EmptyModel);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > 5 {
            return Err(ValidationError::TooManyRetries);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature(self.temperature));
        }
        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(ValidationError::InvalidTopP(self.top_p));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    1
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> AiConfig {
        AiConfig {
            openai_api_key: Some(SecretString::new(key.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.top_p, 0.9);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let initial = Duration::from_millis(100);
        assert_eq!(backoff_delay(initial, 0), Duration::from_millis(100));
        assert_eq!(backoff_delay(initial, 2), Duration::from_millis(400));
        assert_eq!(backoff_delay(initial, 9), Duration::from_millis(3200));
    }

    #[test]
    fn test_worst_case_call_covers_every_attempt() {
        // 60s x 2 attempts + 1s backoff
        assert_eq!(AiConfig::default().worst_case_call(), Duration::from_secs(121));

        let config = AiConfig {
            timeout_secs: 10,
            max_retries: 3,
            ..Default::default()
        };
        // 10s x 4 attempts + (1 + 2 + 4)s backoff
        assert_eq!(config.worst_case_call(), Duration::from_secs(47));
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 30,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validation_missing_key() {
        let config = AiConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_validation_blank_key_counts_as_missing() {
        let config = with_key("   ");
        assert!(!config.has_openai());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(with_key("sk-test").validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_sampling() {
        let config = AiConfig {
            temperature: 3.5,
            ..with_key("sk-test")
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTemperature(_))
        ));

        let config = AiConfig {
            top_p: 0.0,
            ..with_key("sk-test")
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTopP(_))));
    }

    #[test]
    fn test_validation_rejects_non_http_base_url() {
        let config = AiConfig {
            base_url: "ftp://example.com".to_string(),
            ..with_key("sk-test")
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_key_fallback_only_fills_missing_key() {
        let mut config = AiConfig::default();
        config.apply_key_fallback(Some("sk-fallback".to_string()));
        assert_eq!(
            config.openai_api_key.as_ref().unwrap().expose_secret(),
            "sk-fallback"
        );

        let mut config = with_key("sk-primary");
        config.apply_key_fallback(Some("sk-fallback".to_string()));
        assert_eq!(
            config.openai_api_key.as_ref().unwrap().expose_secret(),
            "sk-primary"
        );

        let mut config = AiConfig::default();
        config.apply_key_fallback(Some(String::new()));
        assert!(!config.has_openai());
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = with_key("sk-very-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
    }
}
