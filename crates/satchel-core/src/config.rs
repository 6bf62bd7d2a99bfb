//! Binding behaviour configuration.

use http::StatusCode;
use satchel_extract::ExtractionError;
use serde::{Deserialize, Serialize};

/// Controls how request-time binding failures are answered.
///
/// # Example
///
/// ```
/// use satchel_core::BindConfig;
///
/// let config = BindConfig::new()
///     .rejection_status(422)
///     .expose_rejection_detail(false);
///
/// assert_eq!(config.rejection_status_code(), Some(http::StatusCode::UNPROCESSABLE_ENTITY));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Status used for client-caused binding failures instead of the
    /// status the error carries.
    pub rejection_status: Option<u16>,

    /// Whether the failure message is sent as the response body. When
    /// disabled the canonical reason phrase is sent instead.
    pub expose_rejection_detail: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            rejection_status: None,
            expose_rejection_detail: true,
        }
    }
}

impl BindConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status override for client-caused failures.
    #[must_use]
    pub fn rejection_status(mut self, status: u16) -> Self {
        self.rejection_status = Some(status);
        self
    }

    /// Sets whether failure messages are exposed to clients.
    #[must_use]
    pub fn expose_rejection_detail(mut self, expose: bool) -> Self {
        self.expose_rejection_detail = expose;
        self
    }

    /// Returns the override as a status code.
    ///
    /// Values outside the 4xx range are ignored.
    #[must_use]
    pub fn rejection_status_code(&self) -> Option<StatusCode> {
        self.rejection_status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .filter(StatusCode::is_client_error)
    }

    /// Returns the status to answer `err` with.
    ///
    /// The override only replaces client errors; a server-side failure keeps
    /// its own status.
    #[must_use]
    pub fn status_for(&self, err: &ExtractionError) -> StatusCode {
        match self.rejection_status_code() {
            Some(status) if err.is_client_error() => status,
            _ => err.status_code(),
        }
    }

    /// Returns the body to answer `err` with.
    #[must_use]
    pub fn body_for(&self, err: &ExtractionError, status: StatusCode) -> String {
        if self.expose_rejection_detail {
            err.to_string()
        } else {
            status.canonical_reason().unwrap_or_default().to_string()
        }
    }
}
