//! Route configuration for ChatOPT endpoints.
//!
//! Configures Axum router with the question, masterplan and UI routes.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{ask_questions, generate_masterplan, health, root, ui, MasterplanAppState};

/// Creates the ChatOPT routes without state applied.
///
/// Routes:
/// - `GET /` - Welcome message
/// - `GET /health` - Liveness and configured model
/// - `GET /ui` - Form UI
/// - `POST /ask_questions` - Follow-up questions (`?format=markdown` for a numbered list)
/// - `POST /generate_masterplan` - Masterplan (`?format=markdown` for a single document)
pub fn masterplan_routes() -> Router<MasterplanAppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ui", get(ui))
        .route("/ask_questions", post(ask_questions))
        .route("/generate_masterplan", post(generate_masterplan))
}

/// Creates the complete ChatOPT router with state applied.
///
/// # Example
///
/// ```ignore
/// let state = MasterplanAppState::new(Arc::new(provider));
/// let app = masterplan_router(state).layer(TraceLayer::new_for_http());
/// ```
pub fn masterplan_router(state: MasterplanAppState) -> Router {
    masterplan_routes().with_state(state)
}
