//! Props fixtures for tests.
//!
//! Hand-written [`Props`] implementations covering the shapes the binding
//! engine has to deal with: valid query-bound props, a nested struct field,
//! a field without a source and a field with an empty query key.
//!
//! # Example
//!
//! ```
//! use satchel_core::fixtures::UserProps;
//! use satchel_core::Props;
//!
//! let fields = UserProps::fields();
//! assert_eq!(fields[0].source().map(|s| s.key()), Some("UserID"));
//! ```

use crate::Props;
use satchel_extract::{
    ExtractionError, FieldDescriptor, FieldKind, FieldValue, FromFieldValue, SourceDescriptor,
};

fn set<T: FromFieldValue>(slot: &mut T, field: &str, value: FieldValue) -> Result<(), ExtractionError> {
    *slot = T::from_field_value(value).map_err(|e| ExtractionError::assignment(field, e))?;
    Ok(())
}

fn no_such_field(index: usize) -> ExtractionError {
    ExtractionError::assignment(format!("#{index}"), "no such field")
}

/// A user lookup: `UserID` text and `Active` flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProps {
    /// Bound from `?UserID=`.
    pub user_id: String,
    /// Bound from `?Active=`.
    pub active: bool,
}

impl Props for UserProps {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("user_id", FieldKind::Text).with_source(SourceDescriptor::query("UserID")),
            FieldDescriptor::new("active", FieldKind::Bool).with_source(SourceDescriptor::query("Active")),
        ]
    }

    fn assign(&mut self, index: usize, value: FieldValue) -> Result<(), ExtractionError> {
        match index {
            0 => set(&mut self.user_id, "user_id", value),
            1 => set(&mut self.active, "active", value),
            _ => Err(no_such_field(index)),
        }
    }
}

/// Pagination: `Page` and `PerPage` as `u32`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageProps {
    /// Bound from `?Page=`.
    pub page: u32,
    /// Bound from `?PerPage=`.
    pub per_page: u32,
}

impl Props for PageProps {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("page", <u32 as FromFieldValue>::KIND)
                .with_source(SourceDescriptor::query("Page")),
            FieldDescriptor::new("per_page", <u32 as FromFieldValue>::KIND)
                .with_source(SourceDescriptor::query("PerPage")),
        ]
    }

    fn assign(&mut self, index: usize, value: FieldValue) -> Result<(), ExtractionError> {
        match index {
            0 => set(&mut self.page, "page", value),
            1 => set(&mut self.per_page, "per_page", value),
            _ => Err(no_such_field(index)),
        }
    }
}

/// A nested structure, which cannot be bound from a single query value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Street line.
    pub street: String,
}

/// Props with a nested struct field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressProps {
    /// Bound from `?Name=`.
    pub name: String,
    /// Declared with a query source, but of a composite type.
    pub address: Address,
}

impl Props for AddressProps {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("name", FieldKind::Text).with_source(SourceDescriptor::query("Name")),
            FieldDescriptor::new("address", FieldKind::Composite("Address"))
                .with_source(SourceDescriptor::query("Address")),
        ]
    }

    fn assign(&mut self, index: usize, value: FieldValue) -> Result<(), ExtractionError> {
        match index {
            0 => set(&mut self.name, "name", value),
            1 => Err(ExtractionError::unsupported_field_type(
                "address",
                FieldKind::Composite("Address"),
            )),
            _ => Err(no_such_field(index)),
        }
    }
}

/// Props with a field that declares no source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnboundProps {
    /// Bound from `?UserID=`.
    pub user_id: String,
    /// No source.
    pub note: String,
}

impl Props for UnboundProps {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("user_id", FieldKind::Text).with_source(SourceDescriptor::query("UserID")),
            FieldDescriptor::new("note", FieldKind::Text),
        ]
    }

    fn assign(&mut self, index: usize, value: FieldValue) -> Result<(), ExtractionError> {
        match index {
            0 => set(&mut self.user_id, "user_id", value),
            1 => set(&mut self.note, "note", value),
            _ => Err(no_such_field(index)),
        }
    }
}

/// Props whose only field has an empty query key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmptyKeyProps {
    /// Bound from an empty key.
    pub name: String,
}

impl Props for EmptyKeyProps {
    fn fields() -> Vec<FieldDescriptor> {
        vec![FieldDescriptor::new("name", FieldKind::Text).with_source(SourceDescriptor::query(""))]
    }

    fn assign(&mut self, index: usize, value: FieldValue) -> Result<(), ExtractionError> {
        match index {
            0 => set(&mut self.name, "name", value),
            _ => Err(no_such_field(index)),
        }
    }
}
