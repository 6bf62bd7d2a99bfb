//! Layered configuration for Satchel services.
//!
//! [`SatchelConfig`] groups the settings of a service: the HTTP server, the
//! logging pipeline, and how binding failures are answered. [`ConfigLoader`]
//! builds one from defaults, then a TOML or JSON file, then environment
//! variables.
//!
//! # Example
//!
//! ```no_run
//! use satchel_config::ConfigLoader;
//!
//! # fn main() -> Result<(), satchel_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("satchel.toml")?
//!     .with_env_prefix("SATCHEL")
//!     .load()?;
//!
//! let server = config.server_config();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! max_body_bytes = 2097152
//!
//! [logging]
//! level = "info,satchel_core=debug"
//! json_format = true
//!
//! [binding]
//! rejection_status = 422
//! expose_rejection_detail = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Variables are named `PREFIX_SECTION_KEY`, for example
//! `SATCHEL_SERVER_HTTP_ADDR=127.0.0.1:9000` or
//! `SATCHEL_BINDING_REJECTION_STATUS=422`.

#![doc(html_root_url = "https://docs.rs/satchel-config/0.1.0")]

mod config;
mod error;
mod loader;

pub use config::{SatchelConfig, ServerSection};
pub use error::ConfigError;
pub use loader::ConfigLoader;
