//! HTTP adapter for the ChatOPT endpoints.
//!
//! # Endpoints
//!
//! - `GET /` - Welcome message
//! - `GET /health` - Liveness and configured model
//! - `GET /ui` - Form UI
//! - `POST /ask_questions` - Generate follow-up questions
//! - `POST /generate_masterplan` - Generate the masterplan document

pub mod dto;
pub mod handlers;
pub mod routes;

// Re-export commonly used types
pub use handlers::{MasterplanApiError, MasterplanAppState};
pub use routes::masterplan_router;
