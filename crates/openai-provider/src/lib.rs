//! OpenAI-backed completion provider.
//!
//! This crate provides a [`CompletionProvider`] that talks to an
//! OpenAI-compatible `/v1/chat/completions` endpoint.
//!
//! # Features
//!
//! - Defaults to `gpt-4o-mini`
//! - Structured JSON output when the request asks for it
//! - Refusals and content-filter stops reported as [`ProviderError::Rejected`]
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_provider::OpenAiProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAiProvider::from_env()?;
//!     // Hand the provider to intake_core::generate_summary...
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod provider;

pub use config::{OpenAiConfig, OpenAiConfigBuilder, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use provider::OpenAiProvider;

// Re-export intake-core types for convenience
pub use intake_core::{async_trait, CompletionProvider, CompletionRequest, ProviderError};
