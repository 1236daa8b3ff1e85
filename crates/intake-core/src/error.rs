//! Error types for intake operations.

use thiserror::Error;

/// Errors raised by a [`CompletionProvider`](crate::CompletionProvider).
///
/// Every variant means the single attempt failed; nothing is retried.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider could not be configured (missing key, bad client setup).
    #[error("provider misconfigured: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider refused to produce content (e.g. content filter).
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    /// The provider answered without any completion text.
    #[error("provider returned no completion")]
    EmptyResponse,

    /// The request took longer than the configured timeout.
    #[error("provider request timed out")]
    Timeout,
}

/// Errors from a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The typed failure surface of the service operations.
///
/// The kinds map to different recovery actions: a validation failure asks the
/// user to edit input, provider and parse failures offer a retry.
#[derive(Debug, Clone, Error)]
pub enum IntakeError {
    /// Input rejected before any provider call.
    #[error("{0}")]
    Validation(String),

    /// The completion provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider answered but the text is not a summary object.
    #[error("model output is not a valid summary: {reason}")]
    Parse { reason: String, raw: String },
}

impl IntakeError {
    /// Stable tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            IntakeError::Validation(_) => "validation",
            IntakeError::Provider(_) => "provider",
            IntakeError::Parse { .. } => "parse",
        }
    }

    /// Whether re-sending the same input could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, IntakeError::Validation(_))
    }
}
