//! Application state shared across handlers.

use std::sync::Arc;

use intake_core::CompletionProvider;

/// Shared application state.
///
/// Handlers keep no per-request state here; the provider is the only shared
/// handle and is read-only.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend.
    pub provider: Arc<dyn CompletionProvider>,
    /// Model id sent with every completion.
    pub model: Arc<str>,
}

impl AppState {
    /// Create new application state.
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<Arc<str>>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}
