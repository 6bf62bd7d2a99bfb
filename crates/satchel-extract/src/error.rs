//! Extraction error types.
//!
//! [`ExtractionError`] is the request-time failure of binding one field. It
//! records which part of the request was being read, the field, and enough
//! detail to build a client-facing response.

use crate::{CoercionError, FieldKind};
use http::StatusCode;
use std::fmt;

/// Source of extraction (where data was being read from).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Query string parameters
    Query,
    /// The field declares no source at all
    Unbound,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Unbound => write!(f, "unbound"),
        }
    }
}

/// Error that occurs while hydrating a single field.
///
/// # Example
///
/// ```rust
/// use satchel_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::no_source("user_id");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Unbound);
/// assert!(err.to_string().contains("user_id"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    field: String,
    raw: Option<String>,
    target: Option<FieldKind>,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    /// Field has no resolvable source
    NoSource,
    /// Text could not be coerced into the field type
    Coercion,
    /// Field type can never be bound
    UnsupportedFieldType,
    /// Coerced value did not fit the declared Rust type
    Assignment,
}

impl ExtractionError {
    /// Creates an error for a field with no source descriptor.
    #[must_use]
    pub fn no_source(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            extraction_source: ExtractionSource::Unbound,
            kind: ExtractionErrorKind::NoSource,
            message: format!("no source declared for field '{field}'"),
            field,
            raw: None,
            target: None,
        }
    }

    /// Creates an error from a coercion failure on the given field.
    #[must_use]
    pub fn coercion(source: ExtractionSource, field: impl Into<String>, err: CoercionError) -> Self {
        let field = field.into();
        match err {
            CoercionError::Invalid {
                raw,
                target,
                reason,
            } => Self {
                extraction_source: source,
                kind: ExtractionErrorKind::Coercion,
                message: format!(
                    "invalid {source} parameter for field '{field}': cannot coerce {raw:?} into {target}: {reason}"
                ),
                field,
                raw: Some(raw),
                target: Some(target),
            },
            CoercionError::UnsupportedFieldType { target } => Self::unsupported_field_type(field, target),
        }
    }

    /// Creates an error for a field whose type can never be bound.
    #[must_use]
    pub fn unsupported_field_type(field: impl Into<String>, target: FieldKind) -> Self {
        let field = field.into();
        Self {
            extraction_source: ExtractionSource::Unbound,
            kind: ExtractionErrorKind::UnsupportedFieldType,
            message: format!("field '{field}' has unsupported type {target}"),
            field,
            raw: None,
            target: Some(target),
        }
    }

    /// Creates an error for a coerced value that could not be stored.
    ///
    /// This indicates a props schema whose declared kind disagrees with the
    /// Rust field type.
    #[must_use]
    pub fn assignment(field: impl Into<String>, details: impl Into<String>) -> Self {
        let field = field.into();
        let details = details.into();
        Self {
            extraction_source: ExtractionSource::Unbound,
            kind: ExtractionErrorKind::Assignment,
            message: format!("cannot assign field '{field}': {details}"),
            field,
            raw: None,
            target: None,
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the name of the field being hydrated.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the raw input text, for coercion failures.
    #[must_use]
    pub fn raw_value(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Returns the target kind, when known.
    #[must_use]
    pub fn target(&self) -> Option<FieldKind> {
        self.target
    }

    /// Returns `true` if this error was caused by the request content.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::NoSource | ExtractionErrorKind::Coercion => StatusCode::BAD_REQUEST,
            ExtractionErrorKind::UnsupportedFieldType | ExtractionErrorKind::Assignment => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code suitable for logs and error bodies.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::NoSource => "NO_SOURCE",
            ExtractionErrorKind::Coercion => "INVALID_PARAMETER",
            ExtractionErrorKind::UnsupportedFieldType => "UNSUPPORTED_FIELD_TYPE",
            ExtractionErrorKind::Assignment => "FIELD_ASSIGNMENT_FAILED",
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}
