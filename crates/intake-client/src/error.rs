//! Client error type.

use intake_core::{IntakeError, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Intake(#[from] IntakeError),
}

impl ClientError {
    /// Whether the same action may succeed if tried again unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Storage(_) => false,
            ClientError::Intake(err) => err.is_retryable(),
        }
    }
}
