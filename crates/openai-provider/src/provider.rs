//! OpenAiProvider implementation using the chat-completions API.

use intake_core::{async_trait, CompletionProvider, CompletionRequest, ProviderError};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat,
};
use crate::config::OpenAiConfig;

/// A completion provider backed by an OpenAI-compatible HTTP API.
///
/// Holds no conversation state: every call sends exactly one system and one
/// user message and makes a single attempt.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "OpenAiProvider initialized with model: {}, timeout: {:?}",
            config.model, config.timeout
        );

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables.
    ///
    /// See [`OpenAiConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(OpenAiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Model configured for this deployment.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        let url = self.config.completions_url();

        debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            json = request.response_format.is_some(),
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &error_text));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderError::Api {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            }
        })?;

        debug!(id = %completion.id, model = %completion.model, "Received response from OpenAI API");

        Ok(completion)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let body = build_request(request);
        let completion = self.chat_completion(&body).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        first_choice_text(completion)
    }

    fn name(&self) -> &str {
        "OpenAiProvider"
    }
}

fn build_request(request: CompletionRequest) -> ChatCompletionRequest {
    let CompletionRequest {
        system_prompt,
        user_prompt,
        params,
    } = request;

    ChatCompletionRequest {
        model: params.model,
        messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)],
        temperature: params.temperature,
        max_tokens: params.max_tokens,
        response_format: params.json_object.then(ResponseFormat::json_object),
    }
}

/// Extract the first choice's content, classifying refusals.
fn first_choice_text(completion: ChatCompletionResponse) -> Result<String, ProviderError> {
    let Some(choice) = completion.choices.into_iter().next() else {
        warn!("No choices in response");
        return Err(ProviderError::EmptyResponse);
    };

    if let Some(refusal) = choice.message.refusal {
        return Err(ProviderError::Rejected(refusal));
    }

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(ProviderError::Rejected("content filter".to_string()));
    }

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => {
            warn!("No content in response");
            Err(ProviderError::EmptyResponse)
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(format!("Failed to send request: {}", err))
    }
}

fn api_error(status: u16, body: &str) -> ProviderError {
    let message = match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => api_error.error.message,
        Err(_) => body.to_string(),
    };
    ProviderError::Api { status, message }
}
