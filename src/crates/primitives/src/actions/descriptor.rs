//! Action definitions and their metadata

use crate::error::ActionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Parameters passed to an action handler
pub type Parameters = Map<String, Value>;

/// Future returned by an action handler
pub type ActionFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;

/// Async action handler
pub type ActionHandler = Arc<dyn Fn(Parameters) -> ActionFuture + Send + Sync>;

/// Predicate deciding whether parameters are acceptable for an action
pub type ParameterValidator = Arc<dyn Fn(&Parameters) -> bool + Send + Sync>;

/// Wrap an async closure as an [`ActionHandler`]
pub fn handler_fn<F, Fut>(f: F) -> ActionHandler
where
    F: Fn(Parameters) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(move |params| Box::pin(f(params)))
}

/// Wrap a closure as a [`ParameterValidator`]
pub fn validator_fn<F>(f: F) -> ParameterValidator
where
    F: Fn(&Parameters) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Optional metadata supplied at registration time
///
/// Anything left unset falls back to a default when the action is
/// registered: a generated description, an empty parameter schema, no
/// examples, no confirmation, and a validator that accepts everything.
#[derive(Clone, Default)]
pub struct ActionMetadata {
    pub description: Option<String>,
    pub parameters: Option<Value>,
    pub examples: Vec<Value>,
    pub requires_confirmation: bool,
    pub validate: Option<ParameterValidator>,
}

impl ActionMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Describe the expected parameters, e.g. `{"to": "string"}`
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.examples.push(example);
        self
    }

    pub fn with_confirmation(mut self, requires_confirmation: bool) -> Self {
        self.requires_confirmation = requires_confirmation;
        self
    }

    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Parameters) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(validator_fn(validate));
        self
    }
}

impl std::fmt::Debug for ActionMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionMetadata")
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("examples", &self.examples)
            .field("requires_confirmation", &self.requires_confirmation)
            .field("validate", &self.validate.as_ref().map(|_| "<function>"))
            .finish()
    }
}

/// A registered action with all defaults resolved
#[derive(Clone)]
pub struct ActionDescriptor {
    pub name: String,
    pub handler: ActionHandler,
    pub description: String,
    pub parameters: Value,
    pub examples: Vec<Value>,
    pub requires_confirmation: bool,
    pub validate: ParameterValidator,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>, handler: ActionHandler, metadata: ActionMetadata) -> Self {
        let name = name.into();
        Self {
            description: metadata
                .description
                .unwrap_or_else(|| format!("Execute the {} action", name)),
            parameters: metadata
                .parameters
                .unwrap_or_else(|| Value::Object(Map::new())),
            examples: metadata.examples,
            requires_confirmation: metadata.requires_confirmation,
            validate: metadata.validate.unwrap_or_else(|| validator_fn(|_| true)),
            handler,
            name,
        }
    }

    /// Run the validator against the given parameters
    pub fn accepts(&self, params: &Parameters) -> bool {
        (self.validate)(params)
    }

    pub fn summary(&self) -> ActionSummary {
        ActionSummary {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    pub fn available(&self) -> AvailableAction {
        AvailableAction {
            action: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
            examples: self.examples.clone(),
        }
    }
}

impl std::fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("examples", &self.examples)
            .field("requires_confirmation", &self.requires_confirmation)
            .field("handler", &"<function>")
            .finish()
    }
}

/// Builder for an action definition
///
/// Useful when handlers are assembled from configuration: a definition
/// that ends up without a handler is rejected with
/// [`ActionError::InvalidHandler`] when it is built.
#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    handler: Option<HandlerSlot>,
    metadata: ActionMetadata,
}

#[derive(Clone)]
struct HandlerSlot(ActionHandler);

impl std::fmt::Debug for HandlerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<function>")
    }
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: None,
            metadata: ActionMetadata::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_handler<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Parameters) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.with_shared_handler(handler_fn(f))
    }

    pub fn with_shared_handler(mut self, handler: ActionHandler) -> Self {
        self.handler = Some(HandlerSlot(handler));
        self
    }

    pub fn with_metadata(mut self, metadata: ActionMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Resolve into a descriptor, failing if no handler was attached
    pub fn build(self) -> Result<ActionDescriptor, ActionError> {
        match self.handler {
            Some(HandlerSlot(handler)) => Ok(ActionDescriptor::new(self.name, handler, self.metadata)),
            None => Err(ActionError::InvalidHandler(self.name)),
        }
    }
}

/// Name and description of a registered action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSummary {
    pub name: String,
    pub description: String,
}

/// An action as presented to the model when deciding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableAction {
    pub action: String,
    pub description: String,
    #[serde(default)]
    pub parameters: Value,
    #[serde(default)]
    pub examples: Vec<Value>,
}

impl AvailableAction {
    pub fn new(action: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            description: description.into(),
            parameters: Value::Object(Map::new()),
            examples: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }
}
