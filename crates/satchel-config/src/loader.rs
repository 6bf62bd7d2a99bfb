//! Configuration loader with layered approach.
//!
//! Layers are applied in order, later ones overriding earlier ones:
//! 1. Defaults or a preset
//! 2. Configuration files and strings (TOML or JSON), merged key by key
//! 3. Environment variables

use std::env;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{ConfigError, SatchelConfig};

/// Configuration loader.
///
/// # Example
///
/// ```
/// use satchel_config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_string("[server]\nhttp_addr = \"127.0.0.1:3000\"", "toml")
///     .unwrap()
///     .with_env_vars("SATCHEL", [("SATCHEL_BINDING_REJECTION_STATUS", "422")])
///     .load()
///     .unwrap();
///
/// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
/// assert_eq!(config.binding.rejection_status, Some(422));
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: SatchelConfig,
    env_prefix: Option<String>,
    env_vars: Option<Vec<(String, String)>>,
}

impl ConfigLoader {
    /// Creates a loader starting from default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = SatchelConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = SatchelConfig::production();
        self
    }

    /// Merges a configuration file. The format follows the extension
    /// (`.toml` or `.json`).
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.with_string(&content, format)
    }

    /// Merges a configuration file if it exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Merges configuration from a string in `format` ("toml" or "json").
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let layer: Value = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        let mut merged = serde_json::to_value(&self.config)?;
        merge(&mut merged, layer);
        self.config = serde_json::from_value(merged)?;
        Ok(self)
    }

    /// Applies overrides from process environment variables named
    /// `PREFIX_SECTION_KEY` when the configuration is loaded.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Like [`with_env_prefix`](Self::with_env_prefix), reading the given
    /// variables instead of the process environment.
    #[must_use]
    pub fn with_env_vars<I, K, V>(mut self, prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_prefix = Some(prefix.to_uppercase());
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Applies environment overrides and validates the result.
    pub fn load(mut self) -> Result<SatchelConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars = self
                .env_vars
                .take()
                .unwrap_or_else(|| env::vars().collect());
            for (key, value) in vars {
                self.apply_env_var(&prefix, &key, &value)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or
    /// validation.
    #[must_use]
    pub fn load_unvalidated(self) -> SatchelConfig {
        self.config
    }

    fn apply_env_var(&mut self, prefix: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        let Some(name) = key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('_'))
        else {
            return Ok(());
        };

        let config = &mut self.config;
        match name {
            "SERVER_HTTP_ADDR" => config.server.http_addr = value.to_string(),
            "SERVER_SHUTDOWN_TIMEOUT_SECS" => {
                config.server.shutdown_timeout_secs = parse_number(key, value)?;
            }
            "SERVER_MAX_BODY_BYTES" => config.server.max_body_bytes = parse_number(key, value)?,
            "LOGGING_ENABLED" => config.logging.enabled = parse_flag(key, value)?,
            "LOGGING_LEVEL" => config.logging.level = value.to_string(),
            "LOGGING_JSON_FORMAT" => config.logging.json_format = parse_flag(key, value)?,
            "LOGGING_SPAN_EVENTS" => config.logging.span_events = parse_flag(key, value)?,
            "LOGGING_SERVICE_NAME" => config.logging.service_name = value.to_string(),
            "BINDING_REJECTION_STATUS" => {
                config.binding.rejection_status = if value.is_empty() {
                    None
                } else {
                    Some(parse_number(key, value)?)
                };
            }
            "BINDING_EXPOSE_REJECTION_DETAIL" => {
                config.binding.expose_rejection_detail = parse_flag(key, value)?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Merges `layer` into `base`, recursing into objects.
fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
