//! Logging for Satchel services.
//!
//! Satchel crates emit `tracing` events: plan analysis at `debug`, one
//! `satchel.request` span per request, rejections and write failures at
//! `warn`, and server lifecycle at `info`. This crate installs a
//! `tracing-subscriber` pipeline that renders them as JSON or as
//! human-readable text.
//!
//! # Example
//!
//! ```rust,ignore
//! use satchel_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(service.name = "users", "starting");
//! ```

#![doc(html_root_url = "https://docs.rs/satchel-telemetry/0.1.0")]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
