//! Registration-time errors.
//!
//! A [`BindingError`] means a handler cannot be bound at all. It is raised
//! while building the [`BindingPlan`](crate::BindingPlan), before any request
//! is served, and is never produced per request.

use thiserror::Error;

/// A handler whose props or return shape cannot be bound.
///
/// # Example
///
/// ```
/// use satchel_core::BindingError;
///
/// let err = BindingError::MissingSource {
///     props: "UserProps",
///     field: "user_id",
/// };
/// assert!(err.to_string().contains("user_id"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A props field has a type that can never be coerced from request text.
    #[error("props type {props}: field '{field}' has unsupported type {type_name}")]
    UnsupportedFieldType {
        /// Props type name.
        props: &'static str,
        /// Field name.
        field: &'static str,
        /// Offending type, as declared.
        type_name: String,
    },

    /// A props field has no usable source descriptor.
    #[error(
        "props type {props}: field '{field}' has no source; annotate it with #[param(query = \"...\")]"
    )]
    MissingSource {
        /// Props type name.
        props: &'static str,
        /// Field name.
        field: &'static str,
    },

    /// The handler's return shape maps to no response strategy.
    #[error("invalid handler signature: {reason}")]
    InvalidHandlerSignature {
        /// What is wrong with the signature.
        reason: String,
    },
}

impl BindingError {
    pub(crate) fn invalid_signature(reason: impl Into<String>) -> Self {
        Self::InvalidHandlerSignature {
            reason: reason.into(),
        }
    }

    /// Returns the offending field name, for field-level errors.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedFieldType { field, .. } | Self::MissingSource { field, .. } => Some(field),
            Self::InvalidHandlerSignature { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_field_type_message() {
        let err = BindingError::UnsupportedFieldType {
            props: "UserProps",
            field: "address",
            type_name: "struct Address".into(),
        };
        let message = err.to_string();
        assert!(message.contains("UserProps"));
        assert!(message.contains("address"));
        assert!(message.contains("struct Address"));
        assert_eq!(err.field(), Some("address"));
    }

    #[test]
    fn test_missing_source_message_suggests_attribute() {
        let err = BindingError::MissingSource {
            props: "UserProps",
            field: "user_id",
        };
        assert!(err.to_string().contains("#[param(query"));
        assert_eq!(err.field(), Some("user_id"));
    }

    #[test]
    fn test_invalid_signature() {
        let err = BindingError::invalid_signature("handler returns 2 values");
        assert_eq!(err.to_string(), "invalid handler signature: handler returns 2 values");
        assert_eq!(err.field(), None);
    }
}
