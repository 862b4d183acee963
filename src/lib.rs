// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod donki;
pub mod epic;
pub mod fetch;
pub mod metrics;
pub mod resolve;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::fetch::JsonFetcher;
