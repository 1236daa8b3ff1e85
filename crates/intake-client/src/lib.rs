//! Client side of the symptom intake service.
//!
//! A [`Session`] owns the form, the last summary and the follow-up
//! conversation, persisting them through any [`intake_core::KeyValueStore`].
//! It talks to an [`IntakeBackend`]: either a running intake API
//! ([`HttpBackend`]) or a completion provider in-process ([`DirectBackend`]).

pub mod backend;
pub mod error;
pub mod render;
pub mod session;

pub use backend::{DirectBackend, HttpBackend, IntakeBackend};
pub use error::ClientError;
pub use render::{render_form, render_history, render_summary, DISCLAIMER};
pub use session::{FollowUpOutcome, Session, SummaryState, SummaryTicket, LAST_SUMMARY_KEY};
