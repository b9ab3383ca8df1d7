//! Scripted chat model for tests and offline runs.

use crate::error::{LlmError, Result};
use crate::request::ChatRequest;
use crate::response::{ChatResponse, UsageMetadata};
use crate::traits::ChatModel;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// A [`ChatModel`] that replays queued replies in order.
///
/// Each call pops the next scripted entry; once the queue is empty every
/// call fails with [`LlmError::Other`]. All requests are recorded.
///
/// ```rust
/// use llm::testing::ScriptedModel;
///
/// let model = ScriptedModel::new("scripted")
///     .with_response(r#"{"answer": 42}"#)
///     .with_error(llm::LlmError::Timeout("slow".into()));
/// assert_eq!(model.remaining(), 2);
/// ```
pub struct ScriptedModel {
    name: String,
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl ScriptedModel {
    /// Create an empty script.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Queue a successful reply.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push_response(text);
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: LlmError) -> Self {
        self.push_error(error);
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful reply on a shared model.
    pub fn push_response(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(text.into()));
    }

    /// Queue a failure on a shared model.
    pub fn push_error(&self, error: LlmError) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
    }

    /// Number of replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of `chat` calls received.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Snapshot of every request received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let prompt_len: usize = request.messages.iter().map(|m| m.content.len()).sum();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match next {
            Some(Ok(text)) => {
                // Rough four-bytes-per-token estimate.
                let usage = UsageMetadata::new(prompt_len / 4, text.len() / 4);
                tracing::trace!(model = %self.name, "Scripted reply");
                Ok(ChatResponse::from_text(text).with_usage(usage))
            }
            Some(Err(error)) => Err(error),
            None => Err(LlmError::Other(format!(
                "Scripted model '{}' has no replies left",
                self.name
            ))),
        }
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
