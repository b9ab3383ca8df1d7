//! Layered configuration
//!
//! Configuration is resolved from four sources, later ones winning:
//!
//! 1. `Default` values
//! 2. A config file (TOML, YAML or JSON, chosen by extension)
//! 3. Prefixed environment variables
//! 4. Runtime overrides supplied by the caller
//!
//! A config type implements [`ConfigBuilder`] and names a partial "layer"
//! type whose fields are all optional; each source produces a layer and
//! layers are applied onto the defaults in order.
//!
//! # Example
//!
//! ```rust,ignore
//! use tooling::config::{ConfigBuilder, EnvReader};
//!
//! #[derive(Clone, Default)]
//! struct ServerConfig { port: u16 }
//!
//! #[derive(Default, serde::Deserialize)]
//! struct ServerLayer { port: Option<u16> }
//!
//! impl ConfigBuilder for ServerConfig {
//!     type Layer = ServerLayer;
//!
//!     fn apply(&mut self, layer: ServerLayer) {
//!         if let Some(port) = layer.port { self.port = port; }
//!     }
//!
//!     fn layer_from_env(env: &EnvReader) -> tooling::Result<ServerLayer> {
//!         Ok(ServerLayer { port: env.parse("PORT")? })
//!     }
//! }
//!
//! let config = ServerConfig::load(None, "APP_", ServerLayer::default())?;
//! ```

mod builder;
mod env;

pub use builder::{read_layer_file, ConfigBuilder};
pub use env::EnvReader;
