//! OpenAI Provider - Implementation of AIProvider for OpenAI's chat completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```
//!
//! Transient failures (rate limits, 5xx, network errors, timeouts) are retried
//! with exponential backoff up to `max_retries` times.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{backoff_delay, AiConfig, INITIAL_BACKOFF};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: SecretString,
    /// Model to use (e.g., "gpt-4", "gpt-4o").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Default sampling temperature.
    pub temperature: f32,
    /// Default nucleus sampling cutoff.
    pub top_p: f32,
    /// First backoff delay; doubles on each retry.
    pub initial_backoff: Duration,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 1,
            temperature: 0.7,
            top_p: 0.9,
            initial_backoff: INITIAL_BACKOFF,
        }
    }

    /// Builds provider configuration from the validated application config.
    ///
    /// Returns `AuthenticationFailed` when no key is configured.
    pub fn from_app_config(config: &AiConfig) -> Result<Self, AIError> {
        let key = config
            .openai_api_key
            .as_ref()
            .ok_or(AIError::AuthenticationFailed)?;

        Ok(Self {
            api_key: key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            max_retries: config.max_retries,
            temperature: config.temperature,
            top_p: config.top_p,
            initial_backoff: INITIAL_BACKOFF,
        })
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the first backoff delay.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our request to OpenAI's format: one user message, configured sampling.
    fn to_openai_request<'a>(&'a self, request: &'a CompletionRequest) -> OpenAIRequest<'a> {
        OpenAIRequest {
            model: &self.config.model,
            messages: [OpenAIMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        }
    }

    /// Sends a request.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let openai_request = self.to_openai_request(request);

        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(classify_error_status(status, &error_body))
    }

    /// Parses a successful response.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        completion_from_openai(openai_response)
    }

    async fn attempt(&self, request: &CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(request).await?;
        self.parse_response(response).await
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut retry_count = 0;

        loop {
            match self.attempt(&request).await {
                Ok(completion) => {
                    tracing::debug!(
                        trace_id = %request.metadata.trace_id,
                        operation = request.metadata.operation,
                        model = %completion.model,
                        prompt_tokens = completion.usage.prompt_tokens,
                        completion_tokens = completion.usage.completion_tokens,
                        "OpenAI completion received"
                    );
                    return Ok(completion);
                }
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    let delay = backoff_delay(self.config.initial_backoff, retry_count);
                    tracing::warn!(
                        trace_id = %request.metadata.trace_id,
                        attempt = retry_count + 1,
                        delay_ms = delay.as_millis() as u64,
                        "OpenAI request failed, retrying: {}",
                        err
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

/// Maps a non-success status and body to an error.
fn classify_error_status(status: StatusCode, error_body: &str) -> AIError {
    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(error_body)),
        400 => {
            if error_body.contains("maximum context length")
                || error_body.contains("context_length_exceeded")
            {
                AIError::ContextTooLong(error_message(error_body))
            } else {
                AIError::InvalidRequest(error_message(error_body))
            }
        }
        408 | 504 => AIError::unavailable(format!("Gateway timeout {}", status)),
        500..=599 => AIError::unavailable(format!(
            "Server error {}: {}",
            status,
            error_message(error_body)
        )),
        _ => AIError::network(format!(
            "Unexpected status {}: {}",
            status,
            error_message(error_body)
        )),
    }
}

/// Extracts `error.message` from an OpenAI error body, or returns the body.
fn error_message(error_body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| error_body.to_string())
}

/// Parses retry-after seconds from an error message, defaulting to 30.
fn parse_retry_after(error_body: &str) -> u32 {
    let message = error_message(error_body);
    if let Some(idx) = message.find("try again in ") {
        let rest = &message[idx + "try again in ".len()..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(secs) = digits.parse::<u32>() {
            return secs;
        }
    }
    30
}

fn completion_from_openai(openai_response: OpenAIResponse) -> Result<CompletionResponse, AIError> {
    let choice = openai_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AIError::parse("No choices in response"))?;

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("length") => FinishReason::Length,
        Some("content_filter") => {
            return Err(AIError::content_filtered("completion blocked by provider filter"))
        }
        _ => FinishReason::Stop,
    };

    let usage = openai_response
        .usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        usage,
        model: openai_response.model,
        finish_reason,
    })
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: [OpenAIMessage<'a>; 1],
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RequestMetadata;
    use axum::http::StatusCode as ServerStatus;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn provider(config: OpenAIConfig) -> OpenAIProvider {
        OpenAIProvider::new(config).unwrap()
    }

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest::new(prompt, RequestMetadata::new("test", "t"))
    }

    /// Serves `/chat/completions` on a local port. The first calls answer with
    /// `failures` in order; every later call succeeds with "recovered".
    /// Returns the base URL and a hit counter.
    async fn scripted_upstream(failures: Vec<u16>) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let app = Router::new().route(
            "/chat/completions",
            post(move || {
                let counter = counter.clone();
                let failures = failures.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    match failures.get(n) {
                        Some(&code) => (
                            ServerStatus::from_u16(code).unwrap(),
                            Json(serde_json::json!({"error": {"message": "scripted failure"}})),
                        ),
                        None => (
                            ServerStatus::OK,
                            Json(serde_json::json!({
                                "model": "gpt-4-0613",
                                "choices": [{
                                    "message": {"role": "assistant", "content": "recovered"},
                                    "finish_reason": "stop"
                                }],
                                "usage": {"prompt_tokens": 5, "completion_tokens": 1, "total_tokens": 6}
                            })),
                        ),
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), hits)
    }

    fn fast_retry_config(base_url: String, max_retries: u32) -> OpenAIConfig {
        OpenAIConfig::new("test")
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(max_retries)
            .with_initial_backoff(Duration::from_millis(10))
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(2);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_from_app_config() {
        let app = AiConfig {
            openai_api_key: Some(SecretString::new("sk-app".to_string())),
            base_url: "https://proxy.example.com/v1/".to_string(),
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        let config = OpenAIConfig::from_app_config(&app).unwrap();

        assert_eq!(config.api_key(), "sk-app");
        assert_eq!(config.base_url, "https://proxy.example.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.7);
    }

    #[test]
    fn config_from_app_config_without_key_fails() {
        let result = OpenAIConfig::from_app_config(&AiConfig::default());
        assert!(matches!(result, Err(AIError::AuthenticationFailed)));
    }

    #[test]
    fn request_is_one_user_message_with_configured_sampling() {
        let provider = provider(OpenAIConfig::new("test"));
        let request = request("Hello");

        let body = serde_json::to_value(provider.to_openai_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((body["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn provider_info_reports_model() {
        let provider = provider(OpenAIConfig::new("test").with_model("gpt-4o"));
        let info = provider.provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, "gpt-4o");
    }

    #[test]
    fn status_classification() {
        assert!(matches!(
            classify_error_status(StatusCode::UNAUTHORIZED, ""),
            AIError::AuthenticationFailed
        ));
        assert!(matches!(
            classify_error_status(StatusCode::TOO_MANY_REQUESTS, ""),
            AIError::RateLimited { retry_after_secs: 30 }
        ));
        assert!(matches!(
            classify_error_status(
                StatusCode::BAD_REQUEST,
                r#"{"error":{"message":"This model's maximum context length is 8192 tokens"}}"#
            ),
            AIError::ContextTooLong(_)
        ));
        assert!(matches!(
            classify_error_status(StatusCode::BAD_REQUEST, r#"{"error":{"message":"bad"}}"#),
            AIError::InvalidRequest(ref m) if m == "bad"
        ));
        assert!(classify_error_status(StatusCode::BAD_GATEWAY, "").is_retryable());
        assert!(classify_error_status(StatusCode::GATEWAY_TIMEOUT, "").is_retryable());
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit exceeded. Please try again in 20s."}}"#;
        assert_eq!(parse_retry_after(error), 20);
    }

    #[test]
    fn parse_retry_after_default() {
        let error = r#"{"error":{"message":"Something went wrong"}}"#;
        assert_eq!(parse_retry_after(error), 30);
    }

    #[test]
    fn completion_parsing() {
        let raw = r#"{
            "model": "gpt-4-0613",
            "choices": [{"message": {"role": "assistant", "content": "Hi"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }"#;
        let parsed: OpenAIResponse = serde_json::from_str(raw).unwrap();
        let completion = completion_from_openai(parsed).unwrap();

        assert_eq!(completion.content, "Hi");
        assert_eq!(completion.model, "gpt-4-0613");
        assert_eq!(completion.usage.total_tokens, 12);
        assert_eq!(completion.finish_reason, FinishReason::Stop);
    }

    #[test]
    fn length_finish_is_truncated_completion() {
        let parsed: OpenAIResponse = serde_json::from_str(
            r##"{"model": "gpt-4", "choices": [{"message": {"content": "# Plan\n## Sec"}, "finish_reason": "length"}]}"##,
        )
        .unwrap();
        let completion = completion_from_openai(parsed).unwrap();

        assert!(completion.is_truncated());
        assert_eq!(completion.content, "# Plan\n## Sec");
    }

    #[test]
    fn completion_without_choices_is_parse_error() {
        let parsed: OpenAIResponse =
            serde_json::from_str(r#"{"model": "gpt-4", "choices": []}"#).unwrap();
        assert!(matches!(completion_from_openai(parsed), Err(AIError::Parse(_))));
    }

    #[test]
    fn filtered_completion_is_error() {
        let parsed: OpenAIResponse = serde_json::from_str(
            r#"{"model": "gpt-4", "choices": [{"message": {"content": null}, "finish_reason": "content_filter"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            completion_from_openai(parsed),
            Err(AIError::ContentFiltered { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let provider = provider(
            OpenAIConfig::new("test")
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(Duration::from_secs(2))
                .with_max_retries(0),
        );
        let err = provider.complete(request("Hello")).await.unwrap_err();
        assert!(err.is_retryable(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn server_error_is_retried_until_success() {
        let (base_url, hits) = scripted_upstream(vec![503]).await;
        let provider = provider(fast_retry_config(base_url, 1));

        let completion = provider.complete(request("Hello")).await.unwrap();

        assert_eq!(completion.content, "recovered");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retries_stop_at_max_retries() {
        let (base_url, hits) = scripted_upstream(vec![503, 502, 500]).await;
        let provider = provider(fast_retry_config(base_url, 1));

        let err = provider.complete(request("Hello")).await.unwrap_err();

        assert!(matches!(err, AIError::Unavailable { .. }), "unexpected error: {err}");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn authentication_failure_is_not_retried() {
        let (base_url, hits) = scripted_upstream(vec![401]).await;
        let provider = provider(fast_retry_config(base_url, 3));

        let err = provider.complete(request("Hello")).await.unwrap_err();

        assert!(matches!(err, AIError::AuthenticationFailed));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
