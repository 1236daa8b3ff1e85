//! Backends the client session talks to.
//!
//! [`HttpBackend`] calls the intake API over HTTP. [`DirectBackend`] runs the
//! same service operations in-process against a completion provider.

use std::time::Duration;

use async_trait::async_trait;
use intake_core::{
    answer_follow_up, generate_summary, CompletionProvider, IntakeError, IntakeRecord,
    ProviderError, SummaryResult,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where summaries and answers come from.
#[async_trait]
pub trait IntakeBackend: Send + Sync {
    /// Produce the educational summary for `record`.
    async fn generate_summary(&self, record: &IntakeRecord) -> Result<SummaryResult, IntakeError>;

    /// Answer a follow-up question.
    async fn follow_up(
        &self,
        question: &str,
        record: &IntakeRecord,
        previous_summary: Option<&str>,
    ) -> Result<String, IntakeError>;
}

/// Runs the service operations locally against `P`.
pub struct DirectBackend<P> {
    provider: P,
    model: String,
}

impl<P: CompletionProvider> DirectBackend<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: CompletionProvider> IntakeBackend for DirectBackend<P> {
    async fn generate_summary(&self, record: &IntakeRecord) -> Result<SummaryResult, IntakeError> {
        generate_summary(&self.provider, &self.model, record).await
    }

    async fn follow_up(
        &self,
        question: &str,
        record: &IntakeRecord,
        previous_summary: Option<&str>,
    ) -> Result<String, IntakeError> {
        answer_follow_up(&self.provider, &self.model, question, record, previous_summary).await
    }
}

/// Response envelope shared by both endpoints.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<SummaryResult>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FollowUpBody<'a> {
    question: &'a str,
    form_data: &'a IntakeRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_summary: Option<&'a str>,
}

/// Talks to a running intake API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for the server at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, IntakeError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Envelope, IntakeError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Posting to intake API");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Network(format!("Failed to reach intake API: {}", e))
                }
            })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to read response: {}", e)))?;

        decode_envelope(status, &bytes)
    }
}

/// Turn a raw API response into an envelope, or the typed error it carries.
fn decode_envelope(status: u16, bytes: &[u8]) -> Result<Envelope, IntakeError> {
    let envelope: Envelope = serde_json::from_slice(bytes).map_err(|e| ProviderError::Api {
        status,
        message: format!("Unreadable response: {}", e),
    })?;

    if envelope.success {
        return Ok(envelope);
    }

    let message = envelope
        .error
        .unwrap_or_else(|| "Request failed".to_string());
    Err(match envelope.kind.as_deref() {
        Some("validation") => IntakeError::Validation(message),
        Some("parse") => IntakeError::Parse {
            reason: message,
            raw: String::new(),
        },
        _ => IntakeError::Provider(ProviderError::Api { status, message }),
    })
}

#[async_trait]
impl IntakeBackend for HttpBackend {
    async fn generate_summary(&self, record: &IntakeRecord) -> Result<SummaryResult, IntakeError> {
        let envelope = self.post("/generate-summary", record).await?;
        envelope
            .data
            .ok_or_else(|| IntakeError::Parse {
                reason: "response has no data".to_string(),
                raw: String::new(),
            })
    }

    async fn follow_up(
        &self,
        question: &str,
        record: &IntakeRecord,
        previous_summary: Option<&str>,
    ) -> Result<String, IntakeError> {
        let body = FollowUpBody {
            question,
            form_data: record,
            previous_summary,
        };
        let envelope = self.post("/follow-up", &body).await?;
        envelope.answer.ok_or_else(|| {
            IntakeError::Provider(ProviderError::EmptyResponse)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success() {
        let envelope = decode_envelope(200, br#"{"success":true,"answer":"Rest."}"#).unwrap();
        assert_eq!(envelope.answer.as_deref(), Some("Rest."));
    }

    #[test]
    fn test_decode_validation_failure() {
        let err = decode_envelope(
            400,
            br#"{"success":false,"error":"Question is required","kind":"validation"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, IntakeError::Validation(ref m) if m == "Question is required"));
    }

    #[test]
    fn test_decode_parse_failure() {
        let err = decode_envelope(
            500,
            br#"{"success":false,"error":"Failed to generate summary. Please try again.","kind":"parse"}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "parse");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_decode_untagged_failure_is_provider() {
        let err = decode_envelope(500, br#"{"success":false,"error":"boom"}"#).unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Provider(ProviderError::Api { status: 500, ref message }) if message == "boom"
        ));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_envelope(502, b"<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.kind(), "provider");
    }

    #[test]
    fn test_follow_up_body_shape() {
        let record = IntakeRecord {
            sex: "Male".to_string(),
            ..Default::default()
        };
        let body = FollowUpBody {
            question: "Why?",
            form_data: &record,
            previous_summary: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["question"], "Why?");
        assert_eq!(value["formData"]["sex"], "Male");
        assert!(value.get("previousSummary").is_none());
    }
}
