//! Field coercion engine.
//!
//! [`coerce`] turns one textual input into one typed [`FieldValue`]. It knows
//! nothing about requests or handlers and has no side effects.

use crate::{FieldKind, FieldValue};
use std::fmt;

/// Failure to coerce text into a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// The text is not a valid representation of the target kind.
    Invalid {
        /// The original input text.
        raw: String,
        /// The kind coercion was attempted into.
        target: FieldKind,
        /// Parser diagnostic.
        reason: String,
    },
    /// The target kind can never be coerced from text.
    UnsupportedFieldType {
        /// The rejected kind.
        target: FieldKind,
    },
}

impl CoercionError {
    fn invalid(raw: &str, target: FieldKind, reason: impl Into<String>) -> Self {
        Self::Invalid {
            raw: raw.to_string(),
            target,
            reason: reason.into(),
        }
    }

    /// Returns the kind coercion was attempted into.
    #[must_use]
    pub const fn target(&self) -> FieldKind {
        match self {
            Self::Invalid { target, .. } | Self::UnsupportedFieldType { target } => *target,
        }
    }
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid {
                raw,
                target,
                reason,
            } => write!(f, "cannot coerce {raw:?} into {target}: {reason}"),
            Self::UnsupportedFieldType { target } => {
                write!(f, "unsupported field type: {target}")
            }
        }
    }
}

impl std::error::Error for CoercionError {}

/// Coerces `raw` into a value of the given kind.
///
/// # Example
///
/// ```rust
/// use satchel_extract::{coerce, FieldKind, FieldValue};
///
/// assert_eq!(coerce("42", FieldKind::Int { bits: 64 }), Ok(FieldValue::Int(42)));
/// assert_eq!(coerce("T", FieldKind::Bool), Ok(FieldValue::Bool(true)));
/// assert!(coerce("abc", FieldKind::Int { bits: 64 }).is_err());
/// assert!(coerce("", FieldKind::Bool).is_err());
/// ```
pub fn coerce(raw: &str, kind: FieldKind) -> Result<FieldValue, CoercionError> {
    match kind {
        FieldKind::Bool => parse_bool(raw)
            .map(FieldValue::Bool)
            .ok_or_else(|| CoercionError::invalid(raw, kind, "expected 1, t, true, 0, f or false")),

        FieldKind::Int { bits } => {
            let value: i64 = raw
                .parse()
                .map_err(|e: std::num::ParseIntError| CoercionError::invalid(raw, kind, e.to_string()))?;
            if fits_signed(value, bits) {
                Ok(FieldValue::Int(value))
            } else {
                Err(CoercionError::invalid(raw, kind, "number too large to fit in target type"))
            }
        }

        FieldKind::Uint { bits } => {
            let value: u64 = raw
                .parse()
                .map_err(|e: std::num::ParseIntError| CoercionError::invalid(raw, kind, e.to_string()))?;
            if fits_unsigned(value, bits) {
                Ok(FieldValue::Uint(value))
            } else {
                Err(CoercionError::invalid(raw, kind, "number too large to fit in target type"))
            }
        }

        FieldKind::Float32 => raw
            .parse()
            .map(FieldValue::Float32)
            .map_err(|e: std::num::ParseFloatError| CoercionError::invalid(raw, kind, e.to_string())),

        FieldKind::Float64 => raw
            .parse()
            .map(FieldValue::Float64)
            .map_err(|e: std::num::ParseFloatError| CoercionError::invalid(raw, kind, e.to_string())),

        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),

        FieldKind::Bytes => Ok(FieldValue::Bytes(raw.as_bytes().to_vec())),

        FieldKind::Composite(_) | FieldKind::Unsupported(_) => {
            Err(CoercionError::UnsupportedFieldType { target: kind })
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn fits_signed(value: i64, bits: u32) -> bool {
    match bits {
        0 => false,
        _ if bits >= 64 => true,
        _ => {
            let max = (1_i64 << (bits - 1)) - 1;
            let min = -max - 1;
            (min..=max).contains(&value)
        }
    }
}

fn fits_unsigned(value: u64, bits: u32) -> bool {
    match bits {
        0 => false,
        _ if bits >= 64 => true,
        _ => value < (1_u64 << bits),
    }
}
