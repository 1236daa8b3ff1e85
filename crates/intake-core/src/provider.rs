//! The CompletionProvider trait definition.

use async_trait::async_trait;

use crate::error::ProviderError;

/// Model used when the deployment does not configure one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens.
    pub max_tokens: u32,
    /// Ask the provider to guarantee a syntactically valid JSON object.
    pub json_object: bool,
}

impl CompletionParams {
    /// Parameters for summary generation: structured output on.
    pub fn summary(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.7,
            max_tokens: 2000,
            json_object: true,
        }
    }

    /// Parameters for follow-up answers: free prose.
    pub fn follow_up(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1000,
            json_object: false,
        }
    }
}

/// A single completion call: one system turn, one user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub params: CompletionParams,
}

/// A trait for text-completion backends.
///
/// Implementations range from the OpenAI HTTP client to scripted test
/// doubles. This trait is object-safe and can be used as
/// `Arc<dyn CompletionProvider>`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion and return the first choice's text.
    ///
    /// Exactly one attempt is made; any failure is returned as-is.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Get a human-readable name for this provider.
    fn name(&self) -> &str;
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for std::sync::Arc<P> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        (**self).complete(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
