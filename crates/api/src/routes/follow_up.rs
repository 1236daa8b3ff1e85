//! Follow-up question route.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use intake_core::{CompletionProvider, IntakeRecord};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, Endpoint, Result};
use crate::state::AppState;

/// Request to answer a follow-up question.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FollowUpRequest {
    pub question: Option<String>,
    pub form_data: Option<IntakeRecord>,
    pub previous_summary: Option<String>,
}

/// Successful follow-up response.
#[derive(Debug, Serialize)]
pub struct FollowUpResponse {
    pub success: bool,
    pub answer: String,
}

/// Answer a follow-up question in the context of the intake and last summary.
pub async fn follow_up(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FollowUpRequest>, JsonRejection>,
) -> Result<Json<FollowUpResponse>> {
    let request_id = Uuid::new_v4();
    let Json(req) =
        payload.map_err(|rejection| ApiError::invalid_body(Endpoint::FollowUp, request_id, rejection))?;

    let question = req.question.unwrap_or_default();
    let form_data = req.form_data.unwrap_or_default();
    info!(
        %request_id,
        provider = state.provider.name(),
        question_chars = question.chars().count(),
        has_summary = req.previous_summary.is_some(),
        "Answering follow-up"
    );

    let answer = intake_core::answer_follow_up(
        state.provider.as_ref(),
        &state.model,
        &question,
        &form_data,
        req.previous_summary.as_deref(),
    )
    .await
    .map_err(|err| ApiError::new(Endpoint::FollowUp, request_id, err))?;

    Ok(Json(FollowUpResponse {
        success: true,
        answer,
    }))
}
