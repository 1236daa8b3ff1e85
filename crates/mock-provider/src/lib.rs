//! Mock completion providers for testing.
//!
//! This crate provides mock implementations of the `CompletionProvider` trait:
//! - `ScriptedProvider` - Replies with canned text and records every request
//! - `FailingProvider` - Fails every call with a chosen error
//! - `DelayedProvider` - Wraps another provider with artificial delay
//!
//! For real completions, use the `openai-provider` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_provider::ScriptedProvider;
//! use intake_core::{generate_summary, IntakeRecord, DEFAULT_MODEL};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), intake_core::IntakeError> {
//!     let provider = ScriptedProvider::always(r#"{"summary":"Rest and fluids."}"#);
//!
//!     let summary = generate_summary(&provider, DEFAULT_MODEL, &IntakeRecord::default()).await?;
//!     assert_eq!(summary.summary, "Rest and fluids.");
//!     assert_eq!(provider.call_count(), 1);
//!     Ok(())
//! }
//! ```

mod delayed;
mod failing;
mod scripted;

// Re-export intake-core types for convenience
pub use intake_core::{async_trait, CompletionProvider, CompletionRequest, ProviderError};

// Export mock implementations
pub use delayed::DelayedProvider;
pub use failing::FailingProvider;
pub use scripted::ScriptedProvider;
