//! Response types for chat models.

use crate::messages::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Prompt tokens
    pub input_tokens: usize,
    /// Completion tokens
    pub output_tokens: usize,
    /// Sum of input and output
    pub total_tokens: usize,
}

impl UsageMetadata {
    /// Create usage from input and output counts.
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// A complete chat response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant message
    pub message: Message,

    /// Token usage, when the provider reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageMetadata>,

    /// Provider-specific metadata (model, finish reason, ...)
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl ChatResponse {
    /// Build a response from assistant text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            message: Message::assistant(text),
            usage: None,
            metadata: HashMap::new(),
        }
    }

    /// Attach usage.
    pub fn with_usage(mut self, usage: UsageMetadata) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Assistant text.
    pub fn text(&self) -> &str {
        self.message.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageRole;

    #[test]
    fn test_from_text() {
        let response = ChatResponse::from_text("hello")
            .with_usage(UsageMetadata::new(10, 5))
            .with_metadata("finish_reason", Value::String("stop".into()));

        assert_eq!(response.text(), "hello");
        assert_eq!(response.message.role, MessageRole::Assistant);
        assert_eq!(response.usage.unwrap().total_tokens, 15);
        assert!(response.metadata.contains_key("finish_reason"));
    }
}
