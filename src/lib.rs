// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod config;
pub mod relevance;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::types::{FeedItem, Region};
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::relevance::KeywordFilter;
