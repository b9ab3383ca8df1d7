//! Error types for the primitives crate.

use thiserror::Error;

/// Result type for toolkit setup operations.
pub type Result<T> = std::result::Result<T, PrimitivesError>;

/// Contract violations raised by the action registry.
///
/// These indicate misuse of the API (bad registration or a malformed
/// decision) and are never produced by a handler's own failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// Action definition carries no callable handler
    #[error("Action '{0}' has no callable handler")]
    InvalidHandler(String),

    /// An action with this name is already registered
    #[error("Action '{0}' is already registered")]
    DuplicateAction(String),

    /// Decision is missing or lacks an `action` field
    #[error("Invalid decision: {0}")]
    InvalidDecision(String),

    /// Decision names an action that is not registered
    #[error("Unknown action '{name}'. Available actions: {available}")]
    UnknownAction { name: String, available: String },

    /// The action's validator rejected the parameters
    #[error("Invalid parameters for action '{0}'")]
    InvalidParameters(String),
}

impl ActionError {
    /// Canonical error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidHandler(_) => "E_INVALID_HANDLER",
            Self::DuplicateAction(_) => "E_DUPLICATE_ACTION",
            Self::InvalidDecision(_) => "E_INVALID_DECISION",
            Self::UnknownAction { .. } => "E_UNKNOWN_ACTION",
            Self::InvalidParameters(_) => "E_INVALID_PARAMETERS",
        }
    }
}

/// Errors from toolkit construction and configuration.
#[derive(Debug, Error)]
pub enum PrimitivesError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] tooling::ToolingError),

    /// Model provider failure
    #[error(transparent)]
    Llm(#[from] llm::LlmError),

    /// Registry contract violation
    #[error(transparent)]
    Action(#[from] ActionError),
}
