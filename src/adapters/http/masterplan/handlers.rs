//! HTTP handlers for the ChatOPT endpoints.
//!
//! These handlers connect Axum routes to the orchestration handlers. They
//! validate input into domain types and map failures to status codes; there
//! is no other business logic here.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Json, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::application::handlers::masterplan::{
    GenerateMasterplanCommand, GenerateMasterplanHandler, GenerateQuestionsCommand,
    GenerateQuestionsHandler, OrchestrationError,
};
use crate::domain::{render_api_specs, ValidationError};
use crate::ports::{AIProvider, ProviderInfo};

use super::dto::{
    ErrorResponse, FormatQuery, HealthResponse, MasterplanRequest, MasterplanResponse,
    OutputFormat, QuestionsResponse, WelcomeResponse,
};

const UI_PAGE: &str = include_str!("../../../../static/index.html");

const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

const TIMEOUT_MESSAGE: &str = "The language model did not respond in time";

/// Deadline for one orchestration call when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct MasterplanAppState {
    pub questions_handler: Arc<GenerateQuestionsHandler>,
    pub masterplan_handler: Arc<GenerateMasterplanHandler>,
    pub provider_info: ProviderInfo,
    /// Upper bound on one orchestration call, retries included.
    pub request_timeout: Duration,
}

impl MasterplanAppState {
    /// Wires both handlers to the same provider.
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        let provider_info = ai_provider.provider_info();
        Self {
            questions_handler: Arc::new(GenerateQuestionsHandler::new(ai_provider.clone())),
            masterplan_handler: Arc::new(GenerateMasterplanHandler::new(ai_provider)),
            provider_info,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - Welcome message
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to ChatOPT API. Use /ask_questions to start or /generate_masterplan to create a plan.".to_string(),
    })
}

/// GET /health - Liveness plus configured model
pub async fn health(State(state): State<MasterplanAppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: state.provider_info.name.clone(),
        model: state.provider_info.model.clone(),
    })
}

/// GET /ui - Form UI
pub async fn ui() -> Html<&'static str> {
    Html(UI_PAGE)
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /ask_questions - Generate follow-up questions
///
/// `?format=markdown` returns the questions as a numbered list. Any format
/// other than `json` or `markdown` is rejected before the model is called.
pub async fn ask_questions(
    State(state): State<MasterplanAppState>,
    Query(query): Query<FormatQuery>,
    Json(request): Json<MasterplanRequest>,
) -> Result<Response, MasterplanApiError> {
    let format = query.output_format()?;
    let context = request.to_context()?;

    let result = within_deadline(
        state.request_timeout,
        state.questions_handler.handle(GenerateQuestionsCommand { context }),
    )
    .await?;

    if format == OutputFormat::Markdown {
        return Ok(markdown(result.questions.to_numbered_list()));
    }

    Ok(Json(QuestionsResponse {
        questions: result.questions.into_inner(),
    })
    .into_response())
}

/// POST /generate_masterplan - Generate the masterplan
///
/// `?format=markdown` returns the plan followed by the rendered API specs.
pub async fn generate_masterplan(
    State(state): State<MasterplanAppState>,
    Query(query): Query<FormatQuery>,
    Json(request): Json<MasterplanRequest>,
) -> Result<Response, MasterplanApiError> {
    let format = query.output_format()?;
    let context = request.to_context()?;
    let answers = request.to_answers()?;

    let document = within_deadline(
        state.request_timeout,
        state
            .masterplan_handler
            .handle(GenerateMasterplanCommand { context, answers }),
    )
    .await?;

    let (markdown_content, api_specs) = document.into_parts();

    if format == OutputFormat::Markdown {
        let mut body = markdown_content;
        if !api_specs.is_empty() {
            body.push_str("\n\n");
            body.push_str(&render_api_specs(&api_specs));
        }
        return Ok(markdown(body));
    }

    Ok(Json(MasterplanResponse {
        markdown_content,
        api_specs,
    })
    .into_response())
}

/// Runs an orchestration call under the request deadline.
async fn within_deadline<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, OrchestrationError>>,
) -> Result<T, MasterplanApiError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(MasterplanApiError::DeadlineExceeded(limit)),
    }
}

fn markdown(body: String) -> Response {
    ([(header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE)], body).into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum MasterplanApiError {
    Validation(ValidationError),
    Upstream(OrchestrationError),
    /// The model call, retries included, outlasted the request deadline.
    DeadlineExceeded(Duration),
}

impl From<ValidationError> for MasterplanApiError {
    fn from(err: ValidationError) -> Self {
        MasterplanApiError::Validation(err)
    }
}

impl From<OrchestrationError> for MasterplanApiError {
    fn from(err: OrchestrationError) -> Self {
        MasterplanApiError::Upstream(err)
    }
}

impl IntoResponse for MasterplanApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            MasterplanApiError::Validation(err) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::validation(&err))
            }
            MasterplanApiError::DeadlineExceeded(limit) => {
                tracing::error!(
                    deadline_secs = limit.as_secs_f64(),
                    "Model request exceeded the request deadline"
                );
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorResponse::upstream(TIMEOUT_MESSAGE),
                )
            }
            MasterplanApiError::Upstream(err) => {
                tracing::error!(error = %err, "Model request failed");
                if err.is_timeout() {
                    (
                        StatusCode::GATEWAY_TIMEOUT,
                        ErrorResponse::upstream(TIMEOUT_MESSAGE),
                    )
                } else {
                    (
                        StatusCode::BAD_GATEWAY,
                        ErrorResponse::upstream("The language model request failed"),
                    )
                }
            }
        };

        (status, Json(error)).into_response()
    }
}
