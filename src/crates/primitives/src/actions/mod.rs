//! Named action registry and dispatch
//!
//! Applications register async handlers under unique names; a model's
//! decision (`{"action": ..., "parameters": {...}}`) is then dispatched to
//! the matching handler.
//!
//! Two failure channels are kept apart:
//!
//! - **Contract violations** (duplicate names, malformed decisions, unknown
//!   actions, rejected parameters) are returned as [`ActionError`].
//! - **Handler failures** are captured in an [`ExecutionResult`] with
//!   `success: false` and the handler's error message.
//!
//! ```rust,ignore
//! use primitives::{ActionMetadata, ActionRegistry};
//! use serde_json::json;
//!
//! let mut registry = ActionRegistry::new();
//! registry.register(
//!     "greet",
//!     |params| async move { Ok(json!(format!("hello {}", params["name"]))) },
//!     ActionMetadata::new().with_parameters(json!({"name": "string"})),
//! )?;
//!
//! let result = registry
//!     .execute(&json!({"action": "greet", "parameters": {"name": "Ada"}}))
//!     .await?;
//! assert!(result.success);
//! ```

mod decision;
mod descriptor;

pub use decision::{Decision, ExecutionResult};
pub use descriptor::{
    handler_fn, validator_fn, Action, ActionDescriptor, ActionFuture, ActionHandler,
    ActionMetadata, ActionSummary, AvailableAction, Parameters, ParameterValidator,
};

use crate::error::ActionError;
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use tracing::{debug, info, warn};

/// Registry of named actions
///
/// Listing preserves registration order.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, ActionDescriptor>,
    order: Vec<String>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async closure under `name`
    pub fn register<F, Fut>(
        &mut self,
        name: impl Into<String>,
        handler: F,
        metadata: ActionMetadata,
    ) -> Result<&mut Self, ActionError>
    where
        F: Fn(Parameters) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.register_handler(name, handler_fn(handler), metadata)
    }

    /// Register an already shared handler under `name`
    pub fn register_handler(
        &mut self,
        name: impl Into<String>,
        handler: ActionHandler,
        metadata: ActionMetadata,
    ) -> Result<&mut Self, ActionError> {
        self.insert(ActionDescriptor::new(name, handler, metadata))
    }

    /// Register a definition built with [`Action`]
    pub fn register_action(&mut self, action: Action) -> Result<&mut Self, ActionError> {
        self.insert(action.build()?)
    }

    fn insert(&mut self, descriptor: ActionDescriptor) -> Result<&mut Self, ActionError> {
        if self.actions.contains_key(&descriptor.name) {
            return Err(ActionError::DuplicateAction(descriptor.name));
        }

        debug!(action = %descriptor.name, "Registered action");
        self.order.push(descriptor.name.clone());
        self.actions.insert(descriptor.name.clone(), descriptor);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Remove an action; returns whether it was registered
    pub fn unregister(&mut self, name: &str) -> bool {
        if self.actions.remove(name).is_none() {
            return false;
        }
        self.order.retain(|registered| registered != name);
        debug!(action = %name, "Unregistered action");
        true
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered names in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    fn descriptors(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.order.iter().filter_map(|name| self.actions.get(name))
    }

    /// Name and description of every action
    pub fn list(&self) -> Vec<ActionSummary> {
        self.descriptors().map(ActionDescriptor::summary).collect()
    }

    /// Actions in the shape presented to a model when it decides
    pub fn available_actions(&self) -> Vec<AvailableAction> {
        self.descriptors().map(ActionDescriptor::available).collect()
    }

    /// Execute a decision given as loosely-typed JSON
    pub async fn execute(&self, decision: &Value) -> Result<ExecutionResult, ActionError> {
        let decision = Decision::try_from(decision)?;
        self.execute_decision(&decision).await
    }

    /// Execute a typed decision
    pub async fn execute_decision(&self, decision: &Decision) -> Result<ExecutionResult, ActionError> {
        let descriptor = self
            .actions
            .get(&decision.action)
            .ok_or_else(|| ActionError::UnknownAction {
                name: decision.action.clone(),
                available: self.order.join(", "),
            })?;

        let params = decision.parameters.clone().unwrap_or_default();
        if !descriptor.accepts(&params) {
            return Err(ActionError::InvalidParameters(descriptor.name.clone()));
        }

        if descriptor.requires_confirmation {
            warn!(
                action = %descriptor.name,
                "Action requires confirmation; no confirmation hook is installed, executing anyway"
            );
        }

        debug!(action = %descriptor.name, "Executing action");
        match (descriptor.handler)(params).await {
            Ok(result) => {
                info!(action = %descriptor.name, "Action completed");
                Ok(ExecutionResult::success(&descriptor.name, result))
            }
            Err(err) => {
                warn!(action = %descriptor.name, error = %err, "Action handler failed");
                Ok(ExecutionResult::failure(&descriptor.name, err.to_string()))
            }
        }
    }

    /// Execute several decisions concurrently
    ///
    /// Results are returned in input order; each entry fails or succeeds
    /// independently.
    pub async fn execute_all(&self, decisions: &[Value]) -> Vec<Result<ExecutionResult, ActionError>> {
        join_all(decisions.iter().map(|decision| self.execute(decision))).await
    }
}
