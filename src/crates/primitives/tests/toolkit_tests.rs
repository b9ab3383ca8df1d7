//! Integration tests for toolkit operations over a scripted model

mod common;

use common::{register_support_actions, scripted_toolkit, toolkit_with};
use llm::testing::ScriptedModel;
use llm::LlmError;
use primitives::{
    ActionError, AvailableAction, Operation, Preset, SummaryFormat, SummaryLength,
    SummaryOptions, ToolkitConfig,
};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_extract_from_fenced_response() {
    let (_, toolkit) = scripted_toolkit(&[
        "Here is what I found:\n```json\n{\"name\": \"Ada\", \"born\": 1815}\n```",
    ]);

    let result = toolkit
        .extract(
            "Ada Lovelace was born in 1815.",
            &json!({"name": "string", "born": "number"}),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.operation, Operation::Extract);
    assert_eq!(result.data, Some(json!({"name": "Ada", "born": 1815})));
    assert!(result.metadata.usage.is_some());
}

#[tokio::test]
async fn test_unparsable_response_fails_operation() {
    let (_, toolkit) = scripted_toolkit(&["I'm sorry, I can't help with that."]);

    let result = toolkit.extract("text", &json!({})).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Failed to parse LLM response"));
    assert!(result.data.is_none());
}

#[tokio::test]
async fn test_validate_normalizes_shape() {
    let (_, toolkit) = scripted_toolkit(&[r#"{"errors": ["age must be positive"]}"#]);

    let result = toolkit
        .validate(&json!({"age": -3}), &["age must be positive"])
        .await;

    assert!(result.success);
    assert_eq!(result.field("valid"), Some(&json!(false)));
    assert_eq!(result.field("errors"), Some(&json!(["age must be positive"])));
}

#[tokio::test]
async fn test_summarize_with_options() {
    let (model, toolkit) =
        scripted_toolkit(&[r#"{"summary": "Prices rise.", "key_points": ["inflation"]}"#]);
    let options = SummaryOptions::new()
        .with_length(SummaryLength::Short)
        .with_format(SummaryFormat::Bullets)
        .with_focus("pricing");

    let result = toolkit.summarize("A long article about the economy.", &options).await;

    assert!(result.success);
    assert_eq!(result.field("summary"), Some(&json!("Prices rise.")));
    let system_prompt = model.requests()[0].messages[0].text().to_string();
    assert!(system_prompt.contains("pricing"));
}

#[tokio::test]
async fn test_summary_without_summary_field_fails() {
    let (_, toolkit) = scripted_toolkit(&[r#"{"points": []}"#]);

    let result = toolkit.summarize("text", &SummaryOptions::default()).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Response did not contain a summary"));
}

#[tokio::test]
async fn test_decide_with_explicit_options() {
    let (_, toolkit) = scripted_toolkit(&[
        r#"{"action": "escalate", "parameters": {"team": "billing"}, "reasoning": "refund request", "confidence": 0.8}"#,
    ]);
    let options = [
        AvailableAction::new("escalate", "Hand off to a human team"),
        AvailableAction::new("reply", "Answer directly"),
    ];

    let result = toolkit.decide("Customer wants a refund", Some(&options)).await;

    assert!(result.success);
    assert_eq!(
        result.data,
        Some(json!({
            "action": "escalate",
            "parameters": {"team": "billing"},
            "reasoning": "refund request",
            "confidence": 0.8
        }))
    );
}

#[tokio::test]
async fn test_decide_rejects_unlisted_action() {
    let (_, mut toolkit) = scripted_toolkit(&[r#"{"action": "launch_rocket"}"#]);
    register_support_actions(&mut toolkit);

    let result = toolkit.decide("Something happened", None).await;

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("Model chose unknown action 'launch_rocket'")
    );
}

#[tokio::test]
async fn test_decide_and_execute_runs_handler() {
    let (_, mut toolkit) = scripted_toolkit(&[
        r#"Decision: {"action": "notify", "parameters": {"channel": "ops"}, "confidence": 0.95}"#,
    ]);
    register_support_actions(&mut toolkit);

    let outcome = toolkit.decide_and_execute("Disk usage at 97%").await.unwrap();

    assert!(outcome.decision.success);
    let execution = outcome.execution.expect("action should run");
    assert!(execution.success);
    assert_eq!(execution.action, "notify");
    assert_eq!(execution.result, Some(json!({"notified": {"channel": "ops"}})));
}

#[tokio::test]
async fn test_decide_and_execute_captures_handler_failure() {
    let (_, mut toolkit) = scripted_toolkit(&[r#"{"action": "fail"}"#]);
    register_support_actions(&mut toolkit);

    let outcome = toolkit.decide_and_execute("page someone").await.unwrap();

    let execution = outcome.execution.unwrap();
    assert!(!execution.success);
    assert_eq!(execution.error.as_deref(), Some("pager service down"));
}

#[tokio::test]
async fn test_decide_and_execute_skips_execution_on_failed_decision() {
    let (_, mut toolkit) = scripted_toolkit(&["no idea"]);
    register_support_actions(&mut toolkit);

    let outcome = toolkit.decide_and_execute("?").await.unwrap();

    assert!(!outcome.decision.success);
    assert!(outcome.execution.is_none());
}

#[tokio::test]
async fn test_decide_and_execute_propagates_validator_rejection() {
    let (_, mut toolkit) = scripted_toolkit(&[r#"{"action": "transfer", "parameters": {}}"#]);
    toolkit
        .register_action(
            "transfer",
            |_| async { Ok(json!("moved")) },
            primitives::ActionMetadata::new().with_validator(|p| p.contains_key("amount")),
        )
        .unwrap();

    let err = toolkit.decide_and_execute("move money").await.unwrap_err();
    assert_eq!(err, ActionError::InvalidParameters("transfer".into()));
}

#[tokio::test(start_paused = true)]
async fn test_retryable_errors_are_retried() {
    let model = ScriptedModel::new("flaky")
        .with_error(LlmError::RateLimitExceeded("slow down".into()))
        .with_error(LlmError::ServiceUnavailable("502".into()))
        .with_response(r#"{"ok": true}"#);
    let (model, toolkit) = toolkit_with(model, ToolkitConfig::default());

    let result = toolkit.extract("text", &json!({})).await;

    assert!(result.success);
    assert_eq!(result.metadata.attempts, 3);
    assert_eq!(model.call_count(), 3);
}

#[tokio::test]
async fn test_non_retryable_error_fails_immediately() {
    let model = ScriptedModel::new("locked")
        .with_error(LlmError::AuthenticationError("bad key".into()))
        .with_response(r#"{"ok": true}"#);
    let (model, toolkit) = toolkit_with(model, ToolkitConfig::default());

    let result = toolkit.extract("text", &json!({})).await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Authentication failed: bad key"));
    assert_eq!(result.metadata.attempts, 1);
    assert_eq!(model.remaining(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_model_timeout_becomes_failure() {
    let model = ScriptedModel::new("slow")
        .with_response(r#"{"late": true}"#)
        .with_delay(Duration::from_secs(30));
    let mut config = ToolkitConfig::default();
    config.llm.timeout_secs = 1;
    config.llm.max_retries = 1;
    let (_, toolkit) = toolkit_with(model, config);

    let result = toolkit.extract("text", &json!({})).await;

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.starts_with("Request timeout"), "{error}");
}

#[tokio::test]
async fn test_preset_flows_into_requests() {
    let model = ScriptedModel::new("scripted").with_response(r#"{"a": 1}"#);
    let config = ToolkitConfig::default()
        .with_model("gpt-4o")
        .with_preset(Preset::Creative);
    let (model, toolkit) = toolkit_with(model, config);

    toolkit.extract("text", &json!({})).await;

    let request = &model.requests()[0];
    assert_eq!(request.config.model.as_deref(), Some("gpt-4o"));
    assert_eq!(request.config.temperature, Some(1.0));
    assert_eq!(request.config.max_tokens, Some(1500));
}
