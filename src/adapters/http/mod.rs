//! HTTP adapters - REST API implementations.

pub mod masterplan;

// Re-export key types for convenience
pub use masterplan::{masterplan_router, MasterplanAppState};
