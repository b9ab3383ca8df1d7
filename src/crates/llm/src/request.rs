//! Request types for chat models.

use crate::config::LlmConfig;
use crate::messages::Message;
use serde::{Deserialize, Serialize};

/// Output format hint passed to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text (default)
    #[default]
    Text,
    /// Ask the provider for a JSON object when it supports a JSON mode
    Json,
}

/// Generation settings for a single request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model override for this request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,

    /// Output format hint
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// A request to a chat model: messages plus generation settings.
///
/// # Example
///
/// ```rust
/// use llm::{ChatRequest, Message, ResponseFormat};
///
/// let request = ChatRequest::new(vec![Message::human("List three colours as JSON")])
///     .with_temperature(0.2)
///     .with_response_format(ResponseFormat::Json);
///
/// assert_eq!(request.config.temperature, Some(0.2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The conversation messages to send to the model.
    pub messages: Vec<Message>,

    /// Generation settings.
    pub config: ChatConfig,
}

impl ChatRequest {
    /// Create a new chat request with default settings.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
        }
    }

    /// Apply model, temperature and token limits from an [`LlmConfig`].
    ///
    /// Values already set on the request win.
    pub fn with_defaults_from(mut self, settings: &LlmConfig) -> Self {
        if self.config.model.is_none() {
            self.config.model = Some(settings.model.clone());
        }
        if self.config.temperature.is_none() {
            self.config.temperature = settings.temperature;
        }
        if self.config.max_tokens.is_none() {
            self.config.max_tokens = settings.max_tokens;
        }
        self
    }

    /// Set the model for this request.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    /// Set the temperature for generation.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Add a stop sequence.
    pub fn with_stop_sequence(mut self, stop: impl Into<String>) -> Self {
        self.config.stop_sequences.push(stop.into());
        self
    }

    /// Set the output format hint.
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.config.response_format = format;
        self
    }

    /// Text of the last human message, if any.
    pub fn last_human_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::MessageRole::Human)
            .map(|m| m.text())
    }
}
