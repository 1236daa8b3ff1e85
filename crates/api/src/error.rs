//! Error types for the HTTP API.
//!
//! Handlers never let an error escape as a bare status: every failure is
//! rendered as `{success: false, error, kind}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use intake_core::IntakeError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Which endpoint failed. Selects the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Summary,
    FollowUp,
}

impl Endpoint {
    fn failure_message(self) -> &'static str {
        match self {
            Endpoint::Summary => "Failed to generate summary. Please try again.",
            Endpoint::FollowUp => "Failed to process your question. Please try again.",
        }
    }
}

/// A failed request, tagged with its endpoint and request id.
#[derive(Debug, Error)]
#[error("{endpoint:?} request {request_id} failed: {source}")]
pub struct ApiError {
    endpoint: Endpoint,
    request_id: Uuid,
    #[source]
    source: IntakeError,
}

impl ApiError {
    pub fn new(endpoint: Endpoint, request_id: Uuid, source: IntakeError) -> Self {
        Self {
            endpoint,
            request_id,
            source,
        }
    }

    /// The request body could not be read as JSON of the expected shape.
    pub fn invalid_body(endpoint: Endpoint, request_id: Uuid, rejection: JsonRejection) -> Self {
        warn!(%request_id, error = %rejection.body_text(), "Rejected request body");
        Self::new(
            endpoint,
            request_id,
            IntakeError::Validation("Invalid request body".to_string()),
        )
    }
}

/// Body of every failed response.
#[derive(Debug, Serialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
    pub kind: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.source.kind();
        let request_id = self.request_id;

        let (status, message) = match self.source {
            IntakeError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            IntakeError::Provider(err) => {
                error!(%request_id, endpoint = ?self.endpoint, error = %err, "Provider error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.endpoint.failure_message().to_string(),
                )
            }
            IntakeError::Parse { reason, raw } => {
                error!(
                    %request_id,
                    endpoint = ?self.endpoint,
                    reason = %reason,
                    raw_len = raw.len(),
                    "Unparseable model output"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.endpoint.failure_message().to_string(),
                )
            }
        };

        let body = Failure {
            success: false,
            error: message,
            kind,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
