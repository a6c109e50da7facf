//! HTTP layer for chatrelay.
//!
//! Axum router serving the HTML page, the prompt submission endpoint and the
//! diagnostic turn listing, with CORS, request tracing and optional static
//! files.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod render;
pub mod router;
