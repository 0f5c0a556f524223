//! HTTP presentation layer for Clipforge
//!
//! Axum server exposing generation and estimation endpoints behind API-key
//! authentication and per-identity rate limiting.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use middleware::{ApiKeyAuthLayer, RateLimitLayer};
pub use state::AppState;
