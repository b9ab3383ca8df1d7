//! The chat model trait.
//!
//! The toolkit is an orchestration layer, not an LLM client library: it
//! depends only on this trait, and callers bring their own provider.

use crate::error::Result;
use crate::request::ChatRequest;
use crate::response::ChatResponse;
use async_trait::async_trait;

/// Core trait for chat-based language models.
///
/// Implementations convert the request into their provider's wire format,
/// make the call, and map the reply (and any failure) back. Transient
/// failures should be reported with a variant for which
/// [`LlmError::is_retryable`](crate::LlmError::is_retryable) returns true so
/// callers can retry them.
///
/// Implementations must be `Send + Sync`; share them as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete chat response from messages.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Check if the model/provider is reachable.
    ///
    /// Default implementation assumes availability.
    async fn is_available(&self) -> Result<bool> {
        Ok(true)
    }

    /// Name of the model this client talks to.
    fn model_name(&self) -> &str;
}
