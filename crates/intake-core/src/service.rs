//! The two service operations: summary generation and follow-up answers.

use tracing::{debug, info, warn};

use crate::error::IntakeError;
use crate::intake::IntakeRecord;
use crate::prompt::{
    build_follow_up_prompt, build_summary_prompt, FOLLOW_UP_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT,
};
use crate::provider::{CompletionParams, CompletionProvider, CompletionRequest};
use crate::summary::{SummaryOutcome, SummaryResult};

/// Generate the educational summary for `record`.
///
/// The record is not validated; blank fields become placeholders. A
/// completion that does not parse as a summary is an
/// [`IntakeError::Parse`], never a partial result.
pub async fn generate_summary<P: CompletionProvider + ?Sized>(
    provider: &P,
    model: &str,
    record: &IntakeRecord,
) -> Result<SummaryResult, IntakeError> {
    let request = CompletionRequest {
        system_prompt: SUMMARY_SYSTEM_PROMPT.to_string(),
        user_prompt: build_summary_prompt(record),
        params: CompletionParams::summary(model),
    };

    debug!(provider = provider.name(), model, "Requesting summary");
    let raw = provider.complete(request).await?;

    match SummaryOutcome::parse(&raw) {
        SummaryOutcome::Parsed(result) => {
            info!(
                conditions = result.possible_conditions.len(),
                self_care = result.self_care.len(),
                warning_signs = result.warning_sign.len(),
                "Summary generated"
            );
            Ok(result)
        }
        SummaryOutcome::Malformed { raw, reason } => {
            warn!(reason = %reason, bytes = raw.len(), "Summary output malformed");
            Err(IntakeError::Parse { reason, raw })
        }
    }
}

/// Answer a follow-up question in free prose.
///
/// An empty or whitespace-only question is rejected before the provider is
/// called.
pub async fn answer_follow_up<P: CompletionProvider + ?Sized>(
    provider: &P,
    model: &str,
    question: &str,
    record: &IntakeRecord,
    previous_summary: Option<&str>,
) -> Result<String, IntakeError> {
    if question.trim().is_empty() {
        return Err(IntakeError::Validation("Question is required".to_string()));
    }

    let request = CompletionRequest {
        system_prompt: FOLLOW_UP_SYSTEM_PROMPT.to_string(),
        user_prompt: build_follow_up_prompt(question, record, previous_summary),
        params: CompletionParams::follow_up(model),
    };

    debug!(
        provider = provider.name(),
        model,
        has_summary = previous_summary.is_some(),
        "Requesting follow-up answer"
    );
    let answer = provider.complete(request).await?;
    info!(chars = answer.len(), "Follow-up answered");
    Ok(answer)
}
