//! Core types and contracts for the symptom intake service.
//!
//! This crate provides everything the server and the client share:
//!
//! - [`IntakeRecord`] - The patient-entered questionnaire
//! - [`SummaryResult`] / [`SummaryOutcome`] - The structured model output and its parse result
//! - [`CompletionProvider`] - The trait all LLM backends implement
//! - [`build_summary_prompt`] / [`build_follow_up_prompt`] - Deterministic prompt builders
//! - [`generate_summary`] / [`answer_follow_up`] - The two service operations
//! - [`FormStore`] / [`ConversationStore`] - Client state persisted through a [`KeyValueStore`]
//!
//! # Example
//!
//! ```rust
//! use intake_core::{async_trait, CompletionProvider, CompletionRequest, ProviderError};
//!
//! struct CannedProvider;
//!
//! #[async_trait]
//! impl CompletionProvider for CannedProvider {
//!     async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
//!         Ok("Drink water and rest.".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "CannedProvider"
//!     }
//! }
//! ```

mod de;
mod error;
mod form;
mod history;
mod intake;
mod prompt;
mod provider;
mod service;
mod storage;
mod summary;

pub use error::{IntakeError, ProviderError, StorageError};
pub use form::{decode_record, encode_record, FormStore, FORM_KEY};
pub use history::{
    decode_history, encode_history, ConversationStore, FollowUpEntry, FollowUpTicket, HISTORY_KEY,
};
pub use intake::{IntakeField, IntakeRecord};
pub use prompt::{
    build_follow_up_prompt, build_summary_prompt, hash_prompt, FOLLOW_UP_SYSTEM_PROMPT,
    SUMMARY_SYSTEM_PROMPT,
};
pub use provider::{CompletionParams, CompletionProvider, CompletionRequest, DEFAULT_MODEL};
pub use service::{answer_follow_up, generate_summary};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use summary::{PossibleCondition, SummaryOutcome, SummaryResult, FALLBACK_WARNING_SIGNS};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
