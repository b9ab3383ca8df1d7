//! Integration tests for the action registry

use primitives::{
    handler_fn, Action, ActionError, ActionMetadata, ActionRegistry, Decision, ExecutionResult,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counting_registry(calls: Arc<AtomicUsize>) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry
        .register_handler(
            "count",
            handler_fn(move |params| {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok(json!({"count": n, "params": Value::Object(params)}))
                }
            }),
            ActionMetadata::new().with_description("Count invocations"),
        )
        .unwrap();
    registry
}

#[tokio::test]
async fn test_typed_and_untyped_decisions_agree() {
    let registry = counting_registry(Arc::new(AtomicUsize::new(0)));

    let untyped = registry
        .execute(&json!({"action": "count", "parameters": {"k": 1}}))
        .await
        .unwrap();
    let typed = registry
        .execute_decision(&Decision::new("count").with_parameter("k", json!(1)))
        .await
        .unwrap();

    assert_eq!(untyped.result, Some(json!({"count": 1, "params": {"k": 1}})));
    assert_eq!(typed.result, Some(json!({"count": 2, "params": {"k": 1}})));
}

#[tokio::test]
async fn test_request_errors_do_not_run_handlers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = counting_registry(calls.clone());

    let missing = registry.execute(&Value::Null).await.unwrap_err();
    assert!(matches!(missing, ActionError::InvalidDecision(_)));

    let no_action = registry.execute(&json!({"parameters": {}})).await.unwrap_err();
    assert!(matches!(no_action, ActionError::InvalidDecision(_)));

    let unknown = registry.execute(&json!({"action": "Count"})).await.unwrap_err();
    assert_eq!(
        unknown.to_string(),
        "Unknown action 'Count'. Available actions: count"
    );

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_duplicate_keeps_first_registration() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = counting_registry(calls.clone());

    let err = registry
        .register_action(Action::new("count").with_handler(|_| async { Ok(json!("second")) }))
        .unwrap_err();
    assert_eq!(err, ActionError::DuplicateAction("count".into()));

    let result = registry.execute(&json!({"action": "count"})).await.unwrap();
    assert_eq!(result.result.unwrap()["count"], json!(1));
}

#[tokio::test]
async fn test_handler_error_message_is_verbatim() {
    let mut registry = ActionRegistry::new();
    registry
        .register(
            "deploy",
            |params| async move {
                let env = params.get("env").and_then(Value::as_str).unwrap_or("?");
                anyhow::bail!("cannot deploy to {}", env)
            },
            ActionMetadata::new(),
        )
        .unwrap();

    let result = registry
        .execute(&json!({"action": "deploy", "parameters": {"env": "prod"}}))
        .await
        .unwrap();

    assert_eq!(result, ExecutionResult::failure("deploy", "cannot deploy to prod"));
}

#[test]
fn test_listing_shapes() {
    let mut registry = ActionRegistry::new();
    registry
        .register(
            "search",
            |_| async { Ok(Value::Null) },
            ActionMetadata::new()
                .with_description("Search the knowledge base")
                .with_parameters(json!({"query": "string"}))
                .with_example(json!({"query": "refund policy"})),
        )
        .unwrap()
        .register("noop", |_| async { Ok(Value::Null) }, ActionMetadata::new())
        .unwrap();

    let listed = serde_json::to_value(registry.list()).unwrap();
    assert_eq!(
        listed,
        json!([
            {"name": "search", "description": "Search the knowledge base"},
            {"name": "noop", "description": "Execute the noop action"}
        ])
    );

    let available = serde_json::to_value(registry.available_actions()).unwrap();
    assert_eq!(
        available,
        json!([
            {
                "action": "search",
                "description": "Search the knowledge base",
                "parameters": {"query": "string"},
                "examples": [{"query": "refund policy"}]
            },
            {
                "action": "noop",
                "description": "Execute the noop action",
                "parameters": {},
                "examples": []
            }
        ])
    );
}

#[tokio::test]
async fn test_shared_registry_across_tasks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(counting_registry(calls.clone()));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.execute(&json!({"action": "count"})).await })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().unwrap().success);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 8);
}
