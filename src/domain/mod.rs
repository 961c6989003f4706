//! Domain layer containing the value types and parsing contracts.
//!
//! # Module Organization
//!
//! - `business` - Business context and answers supplied by the caller
//! - `questions` - Follow-up question sets and reply parsing
//! - `masterplan` - Masterplan documents and embedded API specs
//! - `errors` - Validation errors

pub mod business;
pub mod errors;
mod json_block;
pub mod masterplan;
pub mod questions;

pub use business::{Answers, BusinessContext};
pub use errors::ValidationError;
pub use masterplan::{
    extract_api_specs, render_api_specs, ApiEndpoint, ApiSpec, ApiSpecParseError,
    MasterplanDocument,
};
pub use questions::{FollowUpQuestions, QuestionSource};
