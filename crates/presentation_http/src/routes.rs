//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint: no auth, no rate limit
        .route("/health", get(handlers::health::health_check))
        // Generation API
        .route(
            "/api/generate/titles",
            post(handlers::generate::generate_titles),
        )
        .route(
            "/api/generate/shorts",
            post(handlers::generate::generate_shorts),
        )
        // Dry-run estimation
        .route("/api/estimate", post(handlers::estimate::estimate))
        // Attach state
        .with_state(state)
}
