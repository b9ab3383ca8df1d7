//! Configuration builder trait and file loading

use super::env::EnvReader;
use crate::{Result, ToolingError};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Trait for configuration structures assembled from several sources
///
/// Implementors describe how a partial [`Layer`](ConfigBuilder::Layer) is
/// applied and how one is read from the environment; the provided
/// [`load`](ConfigBuilder::load) drives the full precedence chain.
pub trait ConfigBuilder: Default + Clone {
    /// Partial configuration: every field optional, absent means "keep".
    type Layer: Default + DeserializeOwned;

    /// Apply a layer on top of `self`.
    fn apply(&mut self, layer: Self::Layer);

    /// Read a layer from prefixed environment variables.
    fn layer_from_env(env: &EnvReader) -> Result<Self::Layer>;

    /// Validate the final configuration.
    ///
    /// Default implementation: always valid.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Defaults, validated.
    fn build() -> Result<Self> {
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Resolve defaults → file → environment → overrides, then validate.
    fn load(file: Option<&Path>, env_prefix: &str, overrides: Self::Layer) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = file {
            debug!(path = %path.display(), "Applying config file layer");
            config.apply(read_layer_file(path)?);
        }

        let env = EnvReader::new(env_prefix);
        config.apply(Self::layer_from_env(&env)?);
        config.apply(overrides);

        config.validate()?;
        Ok(config)
    }
}

/// Read a partial config from a TOML, YAML or JSON file.
///
/// The format is chosen by extension (`.toml`, `.yaml`/`.yml`, `.json`).
pub fn read_layer_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let parse_error =
        |e: &dyn std::fmt::Display| ToolingError::Config(format!("{}: {}", path.display(), e));

    match extension.as_str() {
        "toml" => toml::from_str(&content).map_err(|e| parse_error(&e)),
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| parse_error(&e)),
        "json" => serde_json::from_str(&content).map_err(|e| parse_error(&e)),
        other => Err(ToolingError::Config(format!(
            "Unsupported config format '{}' for {}",
            other,
            path.display()
        ))),
    }
}
