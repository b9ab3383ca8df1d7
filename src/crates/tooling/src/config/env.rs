//! Prefixed environment variable access

use crate::{Result, ToolingError};
use std::env;
use std::str::FromStr;

/// Reads environment variables that share a common prefix.
///
/// ```rust
/// use tooling::config::EnvReader;
///
/// let env = EnvReader::new("APP_");
/// assert_eq!(env.key("max_tokens"), "APP_MAX_TOKENS");
/// ```
#[derive(Debug, Clone)]
pub struct EnvReader {
    prefix: String,
}

impl EnvReader {
    /// Create a reader for `prefix` (e.g. `"APP_"`).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Full variable name for `name` (uppercased, prefixed).
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name.to_uppercase())
    }

    /// Raw value; `None` when unset or empty.
    pub fn string(&self, name: &str) -> Result<Option<String>> {
        let key = self.key(name);
        match env::var(&key) {
            Ok(val) if val.trim().is_empty() => Ok(None),
            Ok(val) => Ok(Some(val)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ToolingError::Config(format!(
                "Environment variable {} contains invalid UTF-8",
                key
            ))),
        }
    }

    /// Parsed value; a present but unparsable value is an error.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.string(name)? {
            Some(val) => val.trim().parse::<T>().map(Some).map_err(|e| {
                ToolingError::Config(format!(
                    "Failed to parse environment variable {}: {}",
                    self.key(name),
                    e
                ))
            }),
            None => Ok(None),
        }
    }

    /// Boolean flag: true/1/yes/on and false/0/no/off, case-insensitive.
    pub fn flag(&self, name: &str) -> Result<Option<bool>> {
        match self.string(name)? {
            Some(val) => match val.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(ToolingError::Config(format!(
                    "Invalid boolean value for {}: {}",
                    self.key(name),
                    val
                ))),
            },
            None => Ok(None),
        }
    }
}
