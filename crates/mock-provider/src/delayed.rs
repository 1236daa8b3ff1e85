//! A provider that answers late.

use std::time::Duration;

use intake_core::{async_trait, CompletionProvider, CompletionRequest, ProviderError};
use tokio::time::sleep;

/// Sleeps for a fixed delay, then forwards to the wrapped provider.
///
/// Pair a slow and a fast provider to make responses arrive out of order.
pub struct DelayedProvider<P: CompletionProvider> {
    inner: P,
    delay: Duration,
}

impl<P: CompletionProvider> DelayedProvider<P> {
    pub fn new(inner: P, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn with_millis(inner: P, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<P: CompletionProvider> CompletionProvider for DelayedProvider<P> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        sleep(self.delay).await;
        self.inner.complete(request).await
    }

    fn name(&self) -> &str {
        "DelayedProvider"
    }
}
