//! The toolkit: high-level LLM operations over a chat model
//!
//! A [`Toolkit`] is an explicit context object. It owns the model handle,
//! the resolved configuration, a [`ResponseParser`] and an
//! [`ActionRegistry`]; create one per application (or per tenant) and pass
//! it where it is needed.
//!
//! Every operation follows the same pipeline:
//!
//! ```text
//! prompt ─▶ ChatModel (timeout + retry) ─▶ ResponseParser ─▶ normalize ─▶ OperationResult
//! ```
//!
//! Failures at any stage become an [`OperationResult`] with `success: false`;
//! only [`decide_and_execute`](Toolkit::decide_and_execute) returns `Err`,
//! and only for registry contract violations.

use crate::actions::{ActionMetadata, ActionRegistry, AvailableAction, Parameters};
use crate::config::ToolkitConfig;
use crate::error::{ActionError, PrimitivesError};
use crate::parser::{is_parse_failure, ResponseParser};
use crate::prompts;
use crate::result::{DecisionOutcome, Operation, OperationMetadata, OperationResult, PARSE_FAILURE_MESSAGE};
use llm::{ChatModel, ChatRequest, ChatResponse, LlmError, Message, ResponseFormat};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tooling::async_utils::{with_retry_if, with_timeout};
use tooling::config::ConfigBuilder;
use tooling::logging::{format_duration, timed};
use tooling::ToolingError;
use tracing::{debug, info, warn};

/// Requested summary length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Requested summary layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    #[default]
    Paragraph,
    Bullets,
}

/// Options for [`Toolkit::summarize`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    #[serde(default)]
    pub length: SummaryLength,
    #[serde(default)]
    pub format: SummaryFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

impl SummaryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length(mut self, length: SummaryLength) -> Self {
        self.length = length;
        self
    }

    pub fn with_format(mut self, format: SummaryFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }
}

/// High-level LLM operations bound to one model and configuration
pub struct Toolkit {
    model: Arc<dyn ChatModel>,
    config: ToolkitConfig,
    parser: ResponseParser,
    actions: ActionRegistry,
}

impl Toolkit {
    /// Toolkit over `model`; the configuration is validated first
    pub fn new(model: Arc<dyn ChatModel>, config: ToolkitConfig) -> Result<Self, PrimitivesError> {
        config.validate()?;
        let parser = ResponseParser::new().with_verbose(config.verbose);
        Ok(Self {
            model,
            config,
            parser,
            actions: ActionRegistry::new(),
        })
    }

    /// Toolkit configured from `PRIMITIVES_*` environment variables
    pub fn from_env(model: Arc<dyn ChatModel>) -> Result<Self, PrimitivesError> {
        Self::new(model, ToolkitConfig::from_env()?)
    }

    pub fn builder() -> ToolkitBuilder {
        ToolkitBuilder::default()
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn parser(&self) -> &ResponseParser {
        &self.parser
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    /// Register an action on this toolkit's registry
    pub fn register_action<F, Fut>(
        &mut self,
        name: impl Into<String>,
        handler: F,
        metadata: ActionMetadata,
    ) -> Result<&mut ActionRegistry, ActionError>
    where
        F: Fn(Parameters) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.actions.register(name, handler, metadata)
    }

    /// Ask the model whether it can serve requests.
    pub async fn check_model(&self) -> Result<(), PrimitivesError> {
        if self.model.is_available().await? {
            Ok(())
        } else {
            Err(LlmError::ServiceUnavailable(format!(
                "model '{}' is not available",
                self.model.model_name()
            ))
            .into())
        }
    }

    /// Extract structured data matching `schema` from free text
    pub async fn extract(&self, text: &str, schema: &Value) -> OperationResult {
        self.run(Operation::Extract, prompts::extraction(text, schema), Ok)
            .await
    }

    /// Check `data` against natural-language rules
    ///
    /// Data is `{"valid": bool, "errors": [string]}` plus any extra keys the
    /// model returned.
    pub async fn validate<R: AsRef<str>>(&self, data: &Value, rules: &[R]) -> OperationResult {
        self.run(
            Operation::Validate,
            prompts::validation(data, rules),
            normalize_validation,
        )
        .await
    }

    /// Summarize text; data is `{"summary": string, "key_points": [string]}`
    pub async fn summarize(&self, text: &str, options: &SummaryOptions) -> OperationResult {
        self.run(
            Operation::Summarize,
            prompts::summary(text, options),
            normalize_summary,
        )
        .await
    }

    /// Choose an action for `context`
    ///
    /// `options` defaults to every registered action. Data is
    /// `{"action", "parameters", "reasoning", "confidence"}`.
    pub async fn decide(&self, context: &str, options: Option<&[AvailableAction]>) -> OperationResult {
        let registered;
        let options = match options {
            Some(options) => options,
            None => {
                registered = self.actions.available_actions();
                registered.as_slice()
            }
        };

        if options.is_empty() {
            warn!("decide called with no available actions");
            return OperationResult::failure(
                Operation::Decide,
                "No actions available",
                OperationMetadata::new(self.model.model_name(), Duration::ZERO, 0),
            );
        }

        let allowed: Vec<&str> = options.iter().map(|a| a.action.as_str()).collect();
        self.run(
            Operation::Decide,
            prompts::decision(context, options),
            |value| normalize_decision(value, &allowed),
        )
        .await
    }

    /// Decide among registered actions, then execute the choice
    ///
    /// A failed decision is returned with no execution. Registry contract
    /// violations during dispatch are returned as `Err`.
    pub async fn decide_and_execute(&self, context: &str) -> Result<DecisionOutcome, ActionError> {
        let decision = self.decide(context, None).await;

        if !decision.success {
            return Ok(DecisionOutcome {
                decision,
                execution: None,
            });
        }

        let data = decision.data.clone().unwrap_or(Value::Null);
        let execution = self.actions.execute(&data).await?;
        info!(
            action = %execution.action,
            success = execution.success,
            "Decision executed"
        );

        Ok(DecisionOutcome {
            decision,
            execution: Some(execution),
        })
    }

    async fn run<N>(&self, operation: Operation, messages: Vec<Message>, normalize: N) -> OperationResult
    where
        N: FnOnce(Value) -> Result<Value, String>,
    {
        let ((outcome, attempts), elapsed) = timed(operation.as_str(), self.complete(messages)).await;
        let metadata = OperationMetadata::new(self.model.model_name(), elapsed, attempts);

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                warn!(%operation, attempts, error = %err, "Model call failed");
                return OperationResult::failure(operation, err.to_string(), metadata);
            }
        };
        let metadata = metadata.with_usage(response.usage);

        let parsed = self.parser.parse_str(response.text());
        if is_parse_failure(&parsed) {
            return OperationResult::failure(operation, PARSE_FAILURE_MESSAGE, metadata);
        }

        match normalize(parsed) {
            Ok(data) => {
                info!(
                    %operation,
                    attempts,
                    duration_ms = metadata.duration_ms,
                    "Operation completed"
                );
                OperationResult::success(operation, data, metadata)
            }
            Err(message) => {
                warn!(%operation, error = %message, "Model response has the wrong shape");
                OperationResult::failure(operation, message, metadata)
            }
        }
    }

    /// One model call with the configured timeout and retry policy
    async fn complete(&self, messages: Vec<Message>) -> (Result<ChatResponse, LlmError>, usize) {
        let request = ChatRequest::new(messages)
            .with_defaults_from(&self.config.llm)
            .with_response_format(ResponseFormat::Json);
        let policy = self.config.retry_policy();
        let timeout = self.config.llm.timeout();
        let model = &self.model;

        debug!(model = %model.model_name(), max_attempts = policy.max_attempts, "Calling model");
        with_retry_if(&policy, LlmError::is_retryable, || {
            let request = request.clone();
            async move {
                with_timeout(timeout, model.chat(request)).await.map_err(|err| {
                    err.into_inner_or(|elapsed| {
                        LlmError::Timeout(format!("no response after {}", format_duration(elapsed)))
                    })
                })
            }
        })
        .await
    }
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolkit")
            .field("model", &self.model.model_name())
            .field("config", &self.config)
            .field("actions", &self.actions.names())
            .finish()
    }
}

/// Builder for [`Toolkit`]
#[derive(Default)]
pub struct ToolkitBuilder {
    model: Option<Arc<dyn ChatModel>>,
    config: Option<ToolkitConfig>,
    actions: ActionRegistry,
}

impl ToolkitBuilder {
    pub fn model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn config(mut self, config: ToolkitConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a pre-populated registry
    pub fn actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    /// Build the toolkit; the configuration is validated first
    pub fn build(self) -> Result<Toolkit, PrimitivesError> {
        let model = self
            .model
            .ok_or_else(|| ToolingError::Config("a chat model is required".into()))?;
        let mut toolkit = Toolkit::new(model, self.config.unwrap_or_default())?;
        toolkit.actions = self.actions;
        Ok(toolkit)
    }
}

fn expect_object(value: Value) -> Result<Map<String, Value>, String> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("Expected a JSON object, got {}", type_name(&other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn string_list(value: Option<Value>) -> Value {
    match value {
        Some(Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Value::String(s),
                    other => Value::String(other.to_string()),
                })
                .collect(),
        ),
        _ => json!([]),
    }
}

fn normalize_validation(value: Value) -> Result<Value, String> {
    let mut map = expect_object(value)?;
    let valid = map.get("valid").and_then(Value::as_bool).unwrap_or(false);
    let errors = string_list(map.remove("errors"));

    map.insert("valid".into(), Value::Bool(valid));
    map.insert("errors".into(), errors);
    Ok(Value::Object(map))
}

fn normalize_summary(value: Value) -> Result<Value, String> {
    let mut map = expect_object(value)?;
    if !map.get("summary").is_some_and(Value::is_string) {
        return Err("Response did not contain a summary".into());
    }
    let key_points = string_list(map.remove("key_points"));
    map.insert("key_points".into(), key_points);
    Ok(Value::Object(map))
}

fn normalize_decision(value: Value, allowed: &[&str]) -> Result<Value, String> {
    let mut map = expect_object(value)?;

    let action = match map.get("action").and_then(Value::as_str) {
        Some(action) if !action.is_empty() => action.to_string(),
        _ => return Err("Response did not name an action".into()),
    };
    if !allowed.contains(&action.as_str()) {
        return Err(format!("Model chose unknown action '{}'", action));
    }

    let parameters = match map.remove("parameters") {
        Some(Value::Object(params)) => Value::Object(params),
        _ => json!({}),
    };
    let reasoning = match map.remove("reasoning") {
        Some(Value::String(reasoning)) => reasoning,
        _ => String::new(),
    };
    let confidence = map
        .get("confidence")
        .and_then(Value::as_f64)
        .map_or(0.0, |c| c.clamp(0.0, 1.0));

    map.insert("action".into(), Value::String(action));
    map.insert("parameters".into(), parameters);
    map.insert("reasoning".into(), Value::String(reasoning));
    map.insert("confidence".into(), json!(confidence));
    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm::testing::ScriptedModel;

    fn toolkit(model: ScriptedModel) -> (Arc<ScriptedModel>, Toolkit) {
        let model = Arc::new(model);
        let toolkit = Toolkit::new(model.clone(), ToolkitConfig::default()).unwrap();
        (model, toolkit)
    }

    #[test]
    fn test_normalize_validation_defaults() {
        let data = normalize_validation(json!({})).unwrap();
        assert_eq!(data, json!({"valid": false, "errors": []}));

        let data = normalize_validation(json!({"valid": true, "errors": ["a", 1], "note": "x"})).unwrap();
        assert_eq!(data, json!({"valid": true, "errors": ["a", "1"], "note": "x"}));

        assert!(normalize_validation(json!([1])).is_err());
    }

    #[test]
    fn test_normalize_summary() {
        let data = normalize_summary(json!({"summary": "short"})).unwrap();
        assert_eq!(data, json!({"summary": "short", "key_points": []}));

        let err = normalize_summary(json!({"text": "short"})).unwrap_err();
        assert_eq!(err, "Response did not contain a summary");
    }

    #[test]
    fn test_normalize_decision() {
        let data = normalize_decision(json!({"action": "wait"}), &["wait"]).unwrap();
        assert_eq!(
            data,
            json!({"action": "wait", "parameters": {}, "reasoning": "", "confidence": 0.0})
        );

        let data = normalize_decision(json!({"action": "wait", "confidence": 4}), &["wait"]).unwrap();
        assert_eq!(data["confidence"], json!(1.0));

        let err = normalize_decision(json!({"action": "run"}), &["wait"]).unwrap_err();
        assert_eq!(err, "Model chose unknown action 'run'");

        assert!(normalize_decision(json!({"parameters": {}}), &["wait"]).is_err());
    }

    #[tokio::test]
    async fn test_extract_uses_config_defaults() {
        let (model, toolkit) = toolkit(ScriptedModel::new("scripted").with_response(r#"{"name": "Ada"}"#));
        let result = toolkit.extract("Ada Lovelace", &json!({"name": "string"})).await;

        assert!(result.success);
        assert_eq!(result.data, Some(json!({"name": "Ada"})));
        assert_eq!(result.metadata.model, "scripted");
        assert_eq!(result.metadata.attempts, 1);

        let request = &model.requests()[0];
        assert_eq!(request.config.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(request.config.response_format, ResponseFormat::Json);
    }

    #[tokio::test]
    async fn test_decide_without_actions() {
        let (model, toolkit) = toolkit(ScriptedModel::new("scripted"));
        let result = toolkit.decide("anything", None).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No actions available"));
        assert_eq!(result.metadata.attempts, 0);
        assert_eq!(model.call_count(), 0);
    }

    #[test]
    fn test_builder_requires_model() {
        let err = Toolkit::builder().build().unwrap_err();
        assert!(err.to_string().contains("a chat model is required"));
    }

    #[test]
    fn test_builder_validates_config() {
        let mut config = ToolkitConfig::default();
        config.llm.max_retries = 0;

        let result = Toolkit::builder()
            .model(Arc::new(ScriptedModel::new("m")))
            .config(config)
            .build();
        assert!(matches!(result, Err(PrimitivesError::Config(_))));
    }

    #[test]
    fn test_new_rejects_zero_timeout() {
        let mut config = ToolkitConfig::default();
        config.llm.timeout_secs = 0;

        let err = Toolkit::new(Arc::new(ScriptedModel::new("m")), config).unwrap_err();
        assert!(matches!(err, PrimitivesError::Config(_)));
        assert!(err.to_string().contains("timeout_secs must be greater than 0"));
    }
}
