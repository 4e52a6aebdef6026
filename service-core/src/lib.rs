//! service-core: Shared infrastructure for the document viewer and its siblings.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use tracing;
