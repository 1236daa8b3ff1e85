//! Scripted provider - replies with canned text.

use std::collections::VecDeque;
use std::sync::Mutex;

use intake_core::{async_trait, CompletionProvider, CompletionRequest, ProviderError};

#[derive(Debug)]
enum Script {
    Always(String),
    Queue(VecDeque<String>),
}

/// A provider that returns canned replies and records what it was asked.
///
/// Useful for checking exactly which prompts and parameters reach the model.
#[derive(Debug)]
pub struct ScriptedProvider {
    script: Mutex<Script>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    /// Reply with the same text to every call.
    pub fn always(reply: impl Into<String>) -> Self {
        Self::with_script(Script::Always(reply.into()))
    }

    /// Reply with each text once, in order. Calls past the end fail with
    /// [`ProviderError::EmptyResponse`].
    pub fn sequence<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_script(Script::Queue(replies.into_iter().map(Into::into).collect()))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let mut script = self
            .script
            .lock()
            .map_err(|_| ProviderError::Network("script lock poisoned".to_string()))?;

        match &mut *script {
            Script::Always(reply) => Ok(reply.clone()),
            Script::Queue(queue) => queue.pop_front().ok_or(ProviderError::EmptyResponse),
        }
    }

    fn name(&self) -> &str {
        "ScriptedProvider"
    }
}
