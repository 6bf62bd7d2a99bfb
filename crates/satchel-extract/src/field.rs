//! Field schema types.
//!
//! A props structure is described to the binding engine as an ordered list of
//! [`FieldDescriptor`]s. Each descriptor names the field, states its
//! semantic [`FieldKind`] and says where its raw value comes from through a
//! [`SourceDescriptor`].

use crate::ExtractionSource;
use bytes::Bytes;
use std::fmt;

/// Semantic type of a props field.
///
/// Integer kinds carry their bit width so coercion can reject values that do
/// not fit the declared Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `bool`
    Bool,
    /// Signed integer of the given width.
    Int {
        /// Width in bits (8, 16, 32, 64).
        bits: u32,
    },
    /// Unsigned integer of the given width.
    Uint {
        /// Width in bits (8, 16, 32, 64).
        bits: u32,
    },
    /// `f32`
    Float32,
    /// `f64`
    Float64,
    /// `String`
    Text,
    /// Raw byte sequence (`Vec<u8>` or `Bytes`).
    Bytes,
    /// A nested structure. Never bindable.
    Composite(&'static str),
    /// Any other type (references, functions, channels, tuples...).
    Unsupported(&'static str),
}

impl FieldKind {
    /// Returns `true` if values of this kind can be coerced from text.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::Composite(_) | Self::Unsupported(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int { bits } => write!(f, "i{bits}"),
            Self::Uint { bits } => write!(f, "u{bits}"),
            Self::Float32 => write!(f, "f32"),
            Self::Float64 => write!(f, "f64"),
            Self::Text => write!(f, "string"),
            Self::Bytes => write!(f, "bytes"),
            Self::Composite(name) => write!(f, "struct {name}"),
            Self::Unsupported(name) => write!(f, "{name}"),
        }
    }
}

/// Where the raw text for a field is read from.
///
/// Only query parameters are bound today. Headers, path segments and bodies
/// would be further variants dispatched by [`crate::extract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceDescriptor {
    /// A URL query parameter.
    Query {
        /// The query parameter key, matched case-sensitively.
        key: &'static str,
    },
}

impl SourceDescriptor {
    /// Creates a query-parameter source.
    #[must_use]
    pub const fn query(key: &'static str) -> Self {
        Self::Query { key }
    }

    /// Returns the lookup key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Query { key } => key,
        }
    }

    /// Returns the request section this source reads from.
    #[must_use]
    pub const fn extraction_source(&self) -> ExtractionSource {
        match self {
            Self::Query { .. } => ExtractionSource::Query,
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query { key } => write!(f, "query parameter '{key}'"),
        }
    }
}

/// Declared description of one props field.
///
/// # Example
///
/// ```rust
/// use satchel_extract::{FieldDescriptor, FieldKind, SourceDescriptor};
///
/// let field = FieldDescriptor::new("user_id", FieldKind::Text)
///     .with_source(SourceDescriptor::query("UserID"));
///
/// assert_eq!(field.name(), "user_id");
/// assert_eq!(field.source().map(|s| s.key()), Some("UserID"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: FieldKind,
    source: Option<SourceDescriptor>,
}

impl FieldDescriptor {
    /// Creates a descriptor with no source.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            source: None,
        }
    }

    /// Sets the source descriptor.
    #[must_use]
    pub const fn with_source(mut self, source: SourceDescriptor) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns the field name as declared on the props structure.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the semantic type.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the source descriptor, if one was declared.
    #[must_use]
    pub const fn source(&self) -> Option<&SourceDescriptor> {
        self.source.as_ref()
    }
}

/// A coerced, strongly typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Boolean value.
    Bool(bool),
    /// Signed integer, already range-checked for the target width.
    Int(i64),
    /// Unsigned integer, already range-checked for the target width.
    Uint(u64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// Text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Returns a short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed integer",
            Self::Uint(_) => "unsigned integer",
            Self::Float32(_) => "f32",
            Self::Float64(_) => "f64",
            Self::Text(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }
}

/// Canonical textual form. Coercing this text back under the same kind
/// yields an equal value.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
        }
    }
}

/// Conversion from a [`FieldValue`] into a concrete Rust field type.
///
/// Implemented for every type the `Props` derive recognises. `KIND` is the
/// semantic type emitted into the field's descriptor.
pub trait FromFieldValue: Sized {
    /// The semantic kind of this Rust type.
    const KIND: FieldKind;

    /// Converts the value, returning a description of the mismatch on failure.
    fn from_field_value(value: FieldValue) -> Result<Self, String>;
}

fn mismatch(target: &str, value: &FieldValue) -> String {
    format!("expected a value for {target}, got {}", value.variant_name())
}

impl FromFieldValue for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn from_field_value(value: FieldValue) -> Result<Self, String> {
        match value {
            FieldValue::Bool(v) => Ok(v),
            other => Err(mismatch("bool", &other)),
        }
    }
}

macro_rules! impl_from_field_value_for_int {
    ($variant:ident, $kind:ident, $($t:ty),*) => {
        $(
            impl FromFieldValue for $t {
                const KIND: FieldKind = FieldKind::$kind { bits: <$t>::BITS };

                fn from_field_value(value: FieldValue) -> Result<Self, String> {
                    match value {
                        FieldValue::$variant(v) => <$t>::try_from(v)
                            .map_err(|_| format!("{v} is out of range for {}", stringify!($t))),
                        other => Err(mismatch(stringify!($t), &other)),
                    }
                }
            }
        )*
    };
}

impl_from_field_value_for_int!(Int, Int, i8, i16, i32, i64, isize);
impl_from_field_value_for_int!(Uint, Uint, u8, u16, u32, u64, usize);

impl FromFieldValue for f32 {
    const KIND: FieldKind = FieldKind::Float32;

    fn from_field_value(value: FieldValue) -> Result<Self, String> {
        match value {
            FieldValue::Float32(v) => Ok(v),
            other => Err(mismatch("f32", &other)),
        }
    }
}

impl FromFieldValue for f64 {
    const KIND: FieldKind = FieldKind::Float64;

    fn from_field_value(value: FieldValue) -> Result<Self, String> {
        match value {
            FieldValue::Float64(v) => Ok(v),
            other => Err(mismatch("f64", &other)),
        }
    }
}

impl FromFieldValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_field_value(value: FieldValue) -> Result<Self, String> {
        match value {
            FieldValue::Text(v) => Ok(v),
            other => Err(mismatch("String", &other)),
        }
    }
}

impl FromFieldValue for Vec<u8> {
    const KIND: FieldKind = FieldKind::Bytes;

    fn from_field_value(value: FieldValue) -> Result<Self, String> {
        match value {
            FieldValue::Bytes(v) => Ok(v),
            other => Err(mismatch("Vec<u8>", &other)),
        }
    }
}

impl FromFieldValue for Bytes {
    const KIND: FieldKind = FieldKind::Bytes;

    fn from_field_value(value: FieldValue) -> Result<Self, String> {
        match value {
            FieldValue::Bytes(v) => Ok(Bytes::from(v)),
            other => Err(mismatch("Bytes", &other)),
        }
    }
}
