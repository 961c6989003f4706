//! Adapters - Implementations of port interfaces and inbound surfaces.
//!
//! - `ai` - Language model providers (OpenAI, mock)
//! - `http` - Axum REST endpoints and the form UI

pub mod ai;
pub mod http;
