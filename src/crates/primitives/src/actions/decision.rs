//! Decisions and execution results

use super::descriptor::Parameters;
use crate::error::ActionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request to run one registered action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

impl Decision {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            parameters: None,
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters
            .get_or_insert_with(Parameters::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

impl TryFrom<&Value> for Decision {
    type Error = ActionError;

    /// Read a decision out of loosely-typed JSON.
    ///
    /// Extra keys (`reasoning`, `confidence`, ...) are ignored. A null
    /// `parameters` is treated as absent.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = match value {
            Value::Null => return Err(ActionError::InvalidDecision("decision is missing".into())),
            Value::Object(object) => object,
            _ => {
                return Err(ActionError::InvalidDecision(
                    "decision must be a JSON object".into(),
                ))
            }
        };

        let action = match object.get("action").and_then(Value::as_str) {
            Some(action) if !action.is_empty() => action.to_string(),
            _ => {
                return Err(ActionError::InvalidDecision(
                    "decision has no 'action' field".into(),
                ))
            }
        };

        let parameters = match object.get("parameters") {
            None | Some(Value::Null) => None,
            Some(Value::Object(params)) => Some(params.clone()),
            Some(_) => {
                return Err(ActionError::InvalidDecision(
                    "'parameters' must be a JSON object".into(),
                ))
            }
        };

        Ok(Self { action, parameters })
    }
}

/// Outcome of running an action handler
///
/// Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn success(action: impl Into<String>, result: Value) -> Self {
        Self {
            success: true,
            action: action.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(action: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            action: action.into(),
            result: None,
            error: Some(error.into()),
        }
    }
}
