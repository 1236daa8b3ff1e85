//! HTTP API for symptom intake summaries.
//!
//! Two stateless JSON endpoints wrap the [`intake_core`] service operations:
//! `POST /generate-summary` and `POST /follow-up`, plus `GET /health`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use crate::config::{Config, ConfigError};
pub use crate::state::AppState;

/// Build the application with routes, state and middleware.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    routes::router()
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
