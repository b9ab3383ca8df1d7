//! Provider-agnostic chat model seam for the primitives toolkit.
//!
//! This crate defines the narrow interface the toolkit uses to talk to a
//! large language model. It does not ship HTTP clients: any provider can be
//! plugged in by implementing [`ChatModel`].
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::{ChatModel, ChatRequest, Message};
//!
//! async fn ask(model: &dyn ChatModel) -> llm::Result<String> {
//!     let request = ChatRequest::new(vec![
//!         Message::system("Answer in one word."),
//!         Message::human("What colour is the sky?"),
//!     ])
//!     .with_temperature(0.0);
//!
//!     let response = model.chat(request).await?;
//!     Ok(response.text().to_string())
//! }
//! ```
//!
//! # Testing
//!
//! With the opt-in `testing` feature the [`testing::ScriptedModel`] double
//! replays canned responses and records every request it receives. Enable it
//! from `[dev-dependencies]` only.

pub mod config;
pub mod error;
pub mod messages;
pub mod request;
pub mod response;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::LlmConfig;
pub use error::{LlmError, Result};
pub use messages::{Message, MessageRole};
pub use request::{ChatConfig, ChatRequest, ResponseFormat};
pub use response::{ChatResponse, UsageMetadata};
pub use traits::ChatModel;
