//! Common test utilities and setup

#![allow(dead_code)]

use llm::testing::ScriptedModel;
use primitives::{ActionMetadata, Toolkit, ToolkitConfig};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static ENV_PREFIX_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A unique environment prefix so tests never see each other's variables
pub fn unique_env_prefix() -> String {
    let n = ENV_PREFIX_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("PRIMITIVES_TEST_{}_{}_", std::process::id(), n)
}

/// Toolkit over a scripted model that replies in order
pub fn scripted_toolkit(replies: &[&str]) -> (Arc<ScriptedModel>, Toolkit) {
    let model = replies
        .iter()
        .fold(ScriptedModel::new("scripted"), |model, reply| model.with_response(*reply));
    toolkit_with(model, ToolkitConfig::default())
}

pub fn toolkit_with(model: ScriptedModel, config: ToolkitConfig) -> (Arc<ScriptedModel>, Toolkit) {
    let model = Arc::new(model);
    let toolkit = Toolkit::new(model.clone(), config).unwrap();
    (model, toolkit)
}

/// Register `notify` (echoes its parameters) and `fail` (always errors)
pub fn register_support_actions(toolkit: &mut Toolkit) {
    toolkit
        .register_action(
            "notify",
            |params| async move { Ok(json!({"notified": Value::Object(params)})) },
            ActionMetadata::new()
                .with_description("Notify the on-call engineer")
                .with_parameters(json!({"channel": "string"})),
        )
        .expect("register notify")
        .register(
            "fail",
            |_| async { Err(anyhow::anyhow!("pager service down")) },
            ActionMetadata::new(),
        )
        .expect("register fail");
}
