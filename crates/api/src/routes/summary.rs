//! Summary generation route.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use intake_core::{CompletionProvider, IntakeRecord, SummaryResult};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, Endpoint, Result};
use crate::state::AppState;

/// Successful summary response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub data: SummaryResult,
}

/// Generate an educational summary for the posted intake record.
///
/// Fields are not validated here; blank fields become prompt placeholders.
pub async fn generate_summary(
    State(state): State<AppState>,
    payload: std::result::Result<Json<IntakeRecord>, JsonRejection>,
) -> Result<Json<SummaryResponse>> {
    let request_id = Uuid::new_v4();
    let Json(record) =
        payload.map_err(|rejection| ApiError::invalid_body(Endpoint::Summary, request_id, rejection))?;

    info!(
        %request_id,
        provider = state.provider.name(),
        has_symptoms = !record.symptoms.trim().is_empty(),
        "Generating summary"
    );

    let data = intake_core::generate_summary(state.provider.as_ref(), &state.model, &record)
        .await
        .map_err(|err| ApiError::new(Endpoint::Summary, request_id, err))?;

    Ok(Json(SummaryResponse {
        success: true,
        data,
    }))
}
