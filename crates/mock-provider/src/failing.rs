//! Failing provider - every call returns an error.

use std::sync::atomic::{AtomicUsize, Ordering};

use intake_core::{async_trait, CompletionProvider, CompletionRequest, ProviderError};

#[derive(Debug, Clone, Copy)]
enum Failure {
    Network,
    Timeout,
    Rejected,
    Status(u16),
}

/// A provider whose every call fails.
///
/// Useful for exercising error paths without a network.
#[derive(Debug)]
pub struct FailingProvider {
    failure: Failure,
    calls: AtomicUsize,
}

impl FailingProvider {
    fn new(failure: Failure) -> Self {
        Self {
            failure,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail as if the connection was refused.
    pub fn network() -> Self {
        Self::new(Failure::Network)
    }

    /// Fail as if the request timed out.
    pub fn timeout() -> Self {
        Self::new(Failure::Timeout)
    }

    /// Fail as if the provider refused the content.
    pub fn rejected() -> Self {
        Self::new(Failure::Rejected)
    }

    /// Fail with an HTTP status from the provider.
    pub fn status(code: u16) -> Self {
        Self::new(Failure::Status(code))
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(match self.failure {
            Failure::Network => ProviderError::Network("connection refused".to_string()),
            Failure::Timeout => ProviderError::Timeout,
            Failure::Rejected => ProviderError::Rejected("content policy".to_string()),
            Failure::Status(status) => ProviderError::Api {
                status,
                message: "mock provider failure".to_string(),
            },
        })
    }

    fn name(&self) -> &str {
        "FailingProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::CompletionParams;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: String::new(),
            user_prompt: String::new(),
            params: CompletionParams::summary("test-model"),
        }
    }

    #[tokio::test]
    async fn test_each_failure_kind() {
        assert!(matches!(
            FailingProvider::network().complete(request()).await,
            Err(ProviderError::Network(_))
        ));
        assert!(matches!(
            FailingProvider::timeout().complete(request()).await,
            Err(ProviderError::Timeout)
        ));
        assert!(matches!(
            FailingProvider::rejected().complete(request()).await,
            Err(ProviderError::Rejected(_))
        ));
        assert!(matches!(
            FailingProvider::status(503).complete(request()).await,
            Err(ProviderError::Api { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_counts_calls() {
        let provider = FailingProvider::network();
        let _ = provider.complete(request()).await;
        let _ = provider.complete(request()).await;
        assert_eq!(provider.call_count(), 2);
    }
}
