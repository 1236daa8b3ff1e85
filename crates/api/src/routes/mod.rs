//! Route handlers for the intake API.

pub mod follow_up;
pub mod health;
pub mod summary;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .route("/generate-summary", post(summary::generate_summary))
        .route("/follow-up", post(follow_up::follow_up))
}
