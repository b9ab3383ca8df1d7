//! Result envelopes returned by toolkit operations

use crate::actions::ExecutionResult;
use llm::UsageMetadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Error message used when model output could not be parsed
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse LLM response";

/// The high-level operation that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Extract,
    Validate,
    Summarize,
    Decide,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Validate => "validate",
            Self::Summarize => "summarize",
            Self::Decide => "decide",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping attached to every operation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// Model that served the request
    pub model: String,

    /// Wall time including retries
    pub duration_ms: u64,

    /// Model calls made (0 when the operation short-circuited)
    pub attempts: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageMetadata>,
}

impl OperationMetadata {
    pub fn new(model: impl Into<String>, elapsed: Duration, attempts: usize) -> Self {
        Self {
            model: model.into(),
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            attempts,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Option<UsageMetadata>) -> Self {
        self.usage = usage;
        self
    }
}

/// Outcome of a toolkit operation
///
/// Operations never return `Err`: provider failures, timeouts and
/// unparsable output all land here with `success: false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metadata: OperationMetadata,
}

impl OperationResult {
    pub fn success(operation: Operation, data: Value, metadata: OperationMetadata) -> Self {
        Self {
            success: true,
            operation,
            data: Some(data),
            error: None,
            metadata,
        }
    }

    pub fn failure(operation: Operation, error: impl Into<String>, metadata: OperationMetadata) -> Self {
        Self {
            success: false,
            operation,
            data: None,
            error: Some(error.into()),
            metadata,
        }
    }

    /// Look up a top-level field of the data payload
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.get(key))
    }
}

/// What [`Toolkit::decide_and_execute`](crate::Toolkit::decide_and_execute) did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub decision: OperationResult,

    /// Absent when deciding itself failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let metadata = OperationMetadata::new("m", Duration::from_millis(12), 1);
        let result = OperationResult::success(Operation::Extract, json!({"a": 1}), metadata);

        assert_eq!(result.field("a"), Some(&json!(1)));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": true,
                "operation": "extract",
                "data": {"a": 1},
                "metadata": {"model": "m", "duration_ms": 12, "attempts": 1}
            })
        );
    }

    #[test]
    fn test_failure_envelope() {
        let metadata = OperationMetadata::new("m", Duration::ZERO, 0)
            .with_usage(Some(UsageMetadata::new(3, 4)));
        let result = OperationResult::failure(Operation::Decide, PARSE_FAILURE_MESSAGE, metadata);

        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.field("a"), None);
        assert_eq!(result.metadata.usage.unwrap().total_tokens, 7);
        assert_eq!(Operation::Decide.to_string(), "decide");
    }
}
