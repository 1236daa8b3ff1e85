//! The client session: one explicit state object owned by the UI layer.
//!
//! The session holds the form, the latest summary and the follow-up
//! conversation, and owns the storage handle they persist through. Every
//! network round trip is split into `begin_*` and `finish_*` so a response
//! can be matched against the request that produced it; late responses for
//! superseded requests are dropped.

use intake_core::{
    ConversationStore, FollowUpEntry, FollowUpTicket, FormStore, IntakeError, IntakeField,
    IntakeRecord, KeyValueStore, StorageError, SummaryResult,
};
use tracing::{info, warn};

use crate::backend::IntakeBackend;
use crate::error::ClientError;

/// Storage key caching the last summary shown, so a later run can ask
/// follow-up questions against it.
pub const LAST_SUMMARY_KEY: &str = "intake.last_summary";

/// Sequence number for a summary request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryTicket {
    seq: u64,
}

/// Where the results view stands.
#[derive(Debug)]
pub enum SummaryState {
    /// No summary requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// A summary is ready to render.
    Ready(SummaryResult),
    /// The last request failed; the view offers retry and edit actions.
    Failed(IntakeError),
}

/// What happened to a follow-up request.
#[derive(Debug)]
pub enum FollowUpOutcome {
    /// The answer was appended to the history.
    Answered(FollowUpEntry),
    /// A newer question or a clear superseded this one.
    Discarded,
    /// The request failed; the question is kept as a draft.
    Failed(IntakeError),
}

/// One user's session.
pub struct Session<S: KeyValueStore> {
    storage: S,
    form: FormStore,
    history: ConversationStore,
    summary: SummaryState,
    summary_issued: u64,
    summary_pending: Option<u64>,
    draft_question: String,
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session, restoring form, history and any cached summary.
    pub fn open(storage: S) -> Result<Self, StorageError> {
        let form = FormStore::load(&storage)?;
        let history = ConversationStore::load(&storage)?;
        let summary = match storage.get(LAST_SUMMARY_KEY)? {
            Some(raw) => match serde_json::from_str::<SummaryResult>(&raw) {
                Ok(result) => SummaryState::Ready(result),
                Err(err) => {
                    warn!(error = %err, "Ignoring unreadable cached summary");
                    SummaryState::Idle
                }
            },
            None => SummaryState::Idle,
        };

        Ok(Self {
            storage,
            form,
            history,
            summary,
            summary_issued: 0,
            summary_pending: None,
            draft_question: String::new(),
        })
    }

    /// The storage handle.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the storage handle back.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // ----- Form -----

    pub fn form(&self) -> &IntakeRecord {
        self.form.record()
    }

    pub fn set_field(
        &mut self,
        field: IntakeField,
        value: impl Into<String>,
    ) -> Result<(), StorageError> {
        self.form.set(&mut self.storage, field, value)?;
        self.forget_summary()
    }

    /// Reset the form.
    pub fn clear_form(&mut self) -> Result<(), StorageError> {
        self.form.clear(&mut self.storage)?;
        self.forget_summary()
    }

    /// Drop the shown and cached summary, and any summary still in flight.
    /// A summary only ever describes the form as it was when requested.
    fn forget_summary(&mut self) -> Result<(), StorageError> {
        self.storage.remove(LAST_SUMMARY_KEY)?;
        self.summary = SummaryState::Idle;
        self.summary_pending = None;
        Ok(())
    }

    // ----- Summary -----

    pub fn summary(&self) -> &SummaryState {
        &self.summary
    }

    /// The summary text used as follow-up context, if a summary is ready.
    pub fn summary_text(&self) -> Option<&str> {
        match &self.summary {
            SummaryState::Ready(result) => Some(result.summary.as_str()),
            _ => None,
        }
    }

    /// Validate the form and start a summary request. The cached summary is
    /// dropped; only the answer to this request may replace it.
    pub fn begin_summary(&mut self) -> Result<SummaryTicket, ClientError> {
        self.form.validate_for_submit()?;
        self.storage.remove(LAST_SUMMARY_KEY)?;
        self.summary_issued += 1;
        self.summary_pending = Some(self.summary_issued);
        self.summary = SummaryState::Loading;
        Ok(SummaryTicket {
            seq: self.summary_issued,
        })
    }

    /// Apply a summary response. Returns `Ok(false)` if the ticket was stale.
    pub fn finish_summary(
        &mut self,
        ticket: SummaryTicket,
        result: Result<SummaryResult, IntakeError>,
    ) -> Result<bool, StorageError> {
        if self.summary_pending != Some(ticket.seq) {
            warn!(
                seq = ticket.seq,
                latest = self.summary_issued,
                "Dropping stale summary response"
            );
            return Ok(false);
        }
        self.summary_pending = None;

        match result {
            Ok(summary) => {
                self.storage
                    .set(LAST_SUMMARY_KEY, serde_json::to_string(&summary)?)?;
                info!(conditions = summary.possible_conditions.len(), "Summary ready");
                self.summary = SummaryState::Ready(summary);
            }
            Err(err) => {
                self.storage.remove(LAST_SUMMARY_KEY)?;
                warn!(kind = err.kind(), error = %err, "Summary failed");
                self.summary = SummaryState::Failed(err);
            }
        }
        Ok(true)
    }

    /// Request a summary from `backend` and apply it.
    pub async fn request_summary<B: IntakeBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<&SummaryState, ClientError> {
        let ticket = self.begin_summary()?;
        let record = self.form.record().clone();
        let result = backend.generate_summary(&record).await;
        self.finish_summary(ticket, result)?;
        Ok(&self.summary)
    }

    // ----- Follow-up -----

    pub fn history(&self) -> &[FollowUpEntry] {
        self.history.entries()
    }

    /// Question text kept after a failed request, for resubmission.
    pub fn draft_question(&self) -> &str {
        &self.draft_question
    }

    /// Validate `question` and start a follow-up request.
    ///
    /// A blank question never produces a ticket, so it can never reach the
    /// backend.
    pub fn begin_follow_up(&mut self, question: &str) -> Result<FollowUpTicket, IntakeError> {
        if question.trim().is_empty() {
            return Err(IntakeError::Validation("Question is required".to_string()));
        }
        self.draft_question = question.to_string();
        Ok(self.history.begin())
    }

    /// Apply a follow-up response.
    pub fn finish_follow_up(
        &mut self,
        ticket: FollowUpTicket,
        question: &str,
        result: Result<String, IntakeError>,
    ) -> Result<FollowUpOutcome, StorageError> {
        match result {
            Ok(answer) => {
                if !self
                    .history
                    .complete(&mut self.storage, ticket, question, answer)?
                {
                    return Ok(FollowUpOutcome::Discarded);
                }
                self.draft_question.clear();
                Ok(match self.history.entries().last().cloned() {
                    Some(entry) => FollowUpOutcome::Answered(entry),
                    None => FollowUpOutcome::Discarded,
                })
            }
            Err(err) => {
                if !self.history.is_current(ticket) {
                    return Ok(FollowUpOutcome::Discarded);
                }
                self.history.abandon(ticket);
                warn!(kind = err.kind(), error = %err, "Follow-up failed");
                Ok(FollowUpOutcome::Failed(err))
            }
        }
    }

    /// Ask `backend` a follow-up question and apply the answer.
    pub async fn ask<B: IntakeBackend + ?Sized>(
        &mut self,
        backend: &B,
        question: &str,
    ) -> Result<FollowUpOutcome, ClientError> {
        let ticket = self.begin_follow_up(question)?;
        let record = self.form.record().clone();
        let previous = self.summary_text().map(str::to_string);
        let result = backend
            .follow_up(question, &record, previous.as_deref())
            .await;
        Ok(self.finish_follow_up(ticket, question, result)?)
    }

    /// Drop the whole conversation. In-flight answers will be discarded.
    pub fn clear_history(&mut self) -> Result<(), StorageError> {
        self.history.clear(&mut self.storage)
    }
}
