//! The props schema trait.

use satchel_extract::{ExtractionError, FieldDescriptor, FieldValue};

/// A structure whose fields are bound from request data.
///
/// Usually implemented with `#[derive(Props)]` from `satchel-macros`, which
/// emits one [`FieldDescriptor`] per struct field in declaration order and an
/// `assign` that stores a coerced value into the field at that index.
///
/// `Default` supplies the template instance a binding plan keeps; every
/// request works on its own clone of it.
///
/// # Example
///
/// ```
/// use satchel_core::{ExtractionError, FieldDescriptor, FieldKind, FieldValue, FromFieldValue, Props, SourceDescriptor};
///
/// #[derive(Debug, Clone, Default)]
/// struct Search {
///     term: String,
/// }
///
/// impl Props for Search {
///     fn fields() -> Vec<FieldDescriptor> {
///         vec![FieldDescriptor::new("term", FieldKind::Text).with_source(SourceDescriptor::query("q"))]
///     }
///
///     fn assign(&mut self, index: usize, value: FieldValue) -> Result<(), ExtractionError> {
///         match index {
///             0 => {
///                 self.term = String::from_field_value(value)
///                     .map_err(|e| ExtractionError::assignment("term", e))?;
///                 Ok(())
///             }
///             _ => Err(ExtractionError::assignment(format!("#{index}"), "no such field")),
///         }
///     }
/// }
///
/// assert_eq!(Search::fields().len(), 1);
/// ```
pub trait Props: Default + Clone + Send + Sync + 'static {
    /// Returns the ordered field schema.
    fn fields() -> Vec<FieldDescriptor>;

    /// Stores `value` into the field at `index` of [`Props::fields`].
    fn assign(&mut self, index: usize, value: FieldValue) -> Result<(), ExtractionError>;

    /// Returns the type name used in diagnostics.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Handlers that need nothing from the request take `()` as props.
impl Props for () {
    fn fields() -> Vec<FieldDescriptor> {
        Vec::new()
    }

    fn assign(&mut self, index: usize, _value: FieldValue) -> Result<(), ExtractionError> {
        Err(ExtractionError::assignment(format!("#{index}"), "() has no fields"))
    }

    fn type_name() -> &'static str {
        "()"
    }
}
