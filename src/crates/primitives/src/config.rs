//! Toolkit configuration
//!
//! Settings resolve in four layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML, YAML or JSON file
//! 3. `PRIMITIVES_*` environment variables
//! 4. programmatic overrides
//!
//! ```toml
//! model = "gpt-4o"
//! preset = "accurate"
//! max_retries = 5
//! verbose = true
//! ```
//!
//! A preset sets temperature and max tokens together; explicit
//! `temperature` / `max_tokens` in the same layer take precedence over it.

use llm::LlmConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tooling::async_utils::RetryPolicy;
use tooling::config::{ConfigBuilder, EnvReader};
use tooling::ToolingError;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PRIMITIVES_";

/// Named sampling profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Fast,
    Balanced,
    Accurate,
    Creative,
}

impl Preset {
    pub fn temperature(&self) -> f32 {
        match self {
            Self::Fast => 0.3,
            Self::Balanced => 0.7,
            Self::Accurate => 0.1,
            Self::Creative => 1.0,
        }
    }

    pub fn max_tokens(&self) -> usize {
        match self {
            Self::Fast => 500,
            Self::Balanced => 1000,
            Self::Accurate => 2000,
            Self::Creative => 1500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Accurate => "accurate",
            Self::Creative => "creative",
        }
    }

    fn apply_to(&self, llm: &mut LlmConfig) {
        llm.temperature = Some(self.temperature());
        llm.max_tokens = Some(self.max_tokens());
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "accurate" => Ok(Self::Accurate),
            "creative" => Ok(Self::Creative),
            other => Err(format!(
                "unknown preset '{}' (expected fast, balanced, accurate or creative)",
                other
            )),
        }
    }
}

/// Resolved toolkit configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Model settings used for every request
    #[serde(default)]
    pub llm: LlmConfig,

    /// Log unparsable model output at warn level
    #[serde(default)]
    pub verbose: bool,

    /// Last preset applied, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
}

/// One partial layer of configuration; unset fields leave the value alone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolkitConfigLayer {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub verbose: Option<bool>,
    pub preset: Option<Preset>,
}

impl ToolkitConfig {
    pub fn new(llm: LlmConfig) -> Self {
        Self {
            llm,
            ..Self::default()
        }
    }

    /// Defaults overlaid with `PRIMITIVES_*` environment variables
    pub fn from_env() -> tooling::Result<Self> {
        Self::load(None, ENV_PREFIX, ToolkitConfigLayer::default())
    }

    /// Defaults, then `path`, then the environment
    pub fn from_file(path: impl AsRef<Path>) -> tooling::Result<Self> {
        Self::load(Some(path.as_ref()), ENV_PREFIX, ToolkitConfigLayer::default())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.llm.model = model.into();
        self
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        preset.apply_to(&mut self.llm);
        self.preset = Some(preset);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Retry policy for model calls
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.llm.max_retries as usize)
    }
}

impl ConfigBuilder for ToolkitConfig {
    type Layer = ToolkitConfigLayer;

    fn apply(&mut self, layer: ToolkitConfigLayer) {
        if let Some(preset) = layer.preset {
            preset.apply_to(&mut self.llm);
            self.preset = Some(preset);
        }
        if let Some(model) = layer.model {
            self.llm.model = model;
        }
        if let Some(api_key) = layer.api_key {
            self.llm.api_key = Some(api_key);
        }
        if let Some(base_url) = layer.base_url {
            self.llm.base_url = Some(base_url);
        }
        if let Some(temperature) = layer.temperature {
            self.llm.temperature = Some(temperature);
        }
        if let Some(max_tokens) = layer.max_tokens {
            self.llm.max_tokens = Some(max_tokens);
        }
        if let Some(timeout_secs) = layer.timeout_secs {
            self.llm.timeout_secs = timeout_secs;
        }
        if let Some(max_retries) = layer.max_retries {
            self.llm.max_retries = max_retries;
        }
        if let Some(verbose) = layer.verbose {
            self.verbose = verbose;
        }
    }

    fn layer_from_env(env: &EnvReader) -> tooling::Result<ToolkitConfigLayer> {
        Ok(ToolkitConfigLayer {
            model: env.string("model")?,
            api_key: env.string("api_key")?,
            base_url: env.string("base_url")?,
            temperature: env.parse("temperature")?,
            max_tokens: env.parse("max_tokens")?,
            timeout_secs: env.parse("timeout_secs")?,
            max_retries: env.parse("max_retries")?,
            verbose: env.flag("verbose")?,
            preset: env.parse("preset")?,
        })
    }

    fn validate(&self) -> tooling::Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(ToolingError::Config("model must not be empty".into()));
        }
        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ToolingError::Config(format!(
                    "temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
        }
        if self.llm.max_retries < 1 {
            return Err(ToolingError::Config("max_retries must be at least 1".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ToolingError::Config("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}
