//! Configuration sections and their conversions.

use std::net::SocketAddr;
use std::time::Duration;

use satchel_core::BindConfig;
use satchel_server::{
    ServerConfig, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_BYTES, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
use satchel_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Complete configuration of a Satchel service.
///
/// # Example
///
/// ```
/// use satchel_config::SatchelConfig;
///
/// let config = SatchelConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.binding.expose_rejection_detail);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct SatchelConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LogConfig,

    /// How binding failures are answered.
    #[serde(default)]
    pub binding: BindConfig,
}

/// The `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address.
    pub http_addr: String,

    /// Seconds to wait for open connections on shutdown.
    pub shutdown_timeout_secs: u64,

    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl SatchelConfig {
    /// Local development: loopback address and readable debug logs.
    #[must_use]
    pub fn development() -> Self {
        Self {
            server: ServerSection {
                http_addr: "127.0.0.1:8080".to_string(),
                shutdown_timeout_secs: 5,
                ..ServerSection::default()
            },
            logging: LogConfig::development(),
            binding: BindConfig::default(),
        }
    }

    /// Production: JSON logs and rejection details withheld from clients.
    #[must_use]
    pub fn production() -> Self {
        Self {
            server: ServerSection::default(),
            logging: LogConfig::production(),
            binding: BindConfig::new().expose_rejection_detail(false),
        }
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if let Some(status) = self.binding.rejection_status {
            if !(400..500).contains(&status) {
                return Err(ConfigError::invalid_value(
                    "binding.rejection_status",
                    format!("{status} is not a 4xx status"),
                ));
            }
        }

        if self.logging.enabled {
            satchel_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Builds the server configuration.
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .http_addr(self.server.http_addr.clone())
            .shutdown_timeout(Duration::from_secs(self.server.shutdown_timeout_secs))
            .max_body_bytes(self.server.max_body_bytes)
            .build()
    }

    /// Returns the logging configuration.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        self.logging.clone()
    }

    /// Returns the binding configuration.
    #[must_use]
    pub fn bind_config(&self) -> BindConfig {
        self.binding.clone()
    }
}
