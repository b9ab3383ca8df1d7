//! LLM primitives with tolerant structured-output recovery and action dispatch.
//!
//! The crate wraps a [`ChatModel`](llm::ChatModel) in four high-level
//! operations and a registry that turns a model's decision into an
//! application action:
//!
//! - [`Toolkit::extract`] - pull structured data out of free text
//! - [`Toolkit::validate`] - check data against natural-language rules
//! - [`Toolkit::summarize`] - condense text
//! - [`Toolkit::decide`] - choose one of the registered actions
//!
//! Two pieces do the real work underneath:
//!
//! - [`ResponseParser`] recovers a JSON value from model output that may be
//!   fenced in markdown or wrapped in prose. It never fails; unusable output
//!   becomes a sentinel detected by [`is_parse_failure`].
//! - [`ActionRegistry`] stores named async handlers with metadata and
//!   dispatches a decision to one of them. Malformed requests are hard
//!   errors ([`ActionError`]); handler failures come back as an
//!   [`ExecutionResult`] with `success: false`.
//!
//! # Example
//!
//! ```rust,ignore
//! use primitives::{ActionMetadata, Toolkit, ToolkitConfig};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut toolkit = Toolkit::new(Arc::new(my_model), ToolkitConfig::from_env()?)?;
//!
//! toolkit.actions_mut().register(
//!     "send_email",
//!     |params| async move { Ok(json!({"sent_to": params["to"]})) },
//!     ActionMetadata::new()
//!         .with_description("Send an email")
//!         .with_parameters(json!({"to": "string", "body": "string"})),
//! )?;
//!
//! let outcome = toolkit.decide_and_execute("The customer asked for a receipt").await?;
//! if let Some(execution) = outcome.execution {
//!     println!("{} -> {}", execution.action, execution.success);
//! }
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod result;
pub mod toolkit;

pub use actions::{
    handler_fn, validator_fn, Action, ActionDescriptor, ActionFuture, ActionHandler, ActionMetadata,
    ActionRegistry, ActionSummary, AvailableAction, Decision, ExecutionResult, Parameters,
    ParameterValidator,
};
pub use config::{Preset, ToolkitConfig, ToolkitConfigLayer, ENV_PREFIX};
pub use error::{ActionError, PrimitivesError, Result};
pub use parser::{is_parse_failure, ParseError, ResponseParser, PARSE_FAILURE_KEY};
pub use result::{DecisionOutcome, Operation, OperationMetadata, OperationResult};
pub use toolkit::{SummaryFormat, SummaryLength, SummaryOptions, Toolkit, ToolkitBuilder};
