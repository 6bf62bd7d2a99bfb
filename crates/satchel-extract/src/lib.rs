//! # Satchel Extract
//!
//! Field coercion and request extraction for the Satchel binding layer.
//!
//! This crate knows how to describe a props field, how to read the raw text
//! for that field out of a request, and how to turn that text into a typed
//! value. It does not know about handlers; that lives in `satchel-core`.
//!
//! | Item | Role |
//! |------|------|
//! | [`FieldDescriptor`] | Name, [`FieldKind`] and [`SourceDescriptor`] of one field |
//! | [`coerce`] | Text to [`FieldValue`] conversion for a [`FieldKind`] |
//! | [`ExtractionContext`] | Read-only view of one request |
//! | [`extract`] | Source lookup followed by coercion |
//! | [`FromFieldValue`] | Narrowing from [`FieldValue`] into the declared Rust type |
//!
//! ## Example
//!
//! ```rust
//! use satchel_extract::{extract, ExtractionContextBuilder, FieldDescriptor, FieldKind, FieldValue, SourceDescriptor};
//! use http::Uri;
//!
//! let ctx = ExtractionContextBuilder::new()
//!     .uri(Uri::from_static("/users?Page=3"))
//!     .build();
//!
//! let page = FieldDescriptor::new("page", FieldKind::Uint { bits: 32 })
//!     .with_source(SourceDescriptor::query("Page"));
//!
//! assert_eq!(extract(&ctx, &page).unwrap(), FieldValue::Uint(3));
//! ```
//!
//! ## Error Handling
//!
//! Extraction fails with an [`ExtractionError`], which records the request
//! section, the field and a status code:
//!
//! ```rust
//! use satchel_extract::{coerce, ExtractionError, ExtractionSource, FieldKind};
//!
//! let cause = coerce("abc", FieldKind::Int { bits: 64 }).unwrap_err();
//! let err = ExtractionError::coercion(ExtractionSource::Query, "page", cause);
//!
//! assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
//! ```

#![doc(html_root_url = "https://docs.rs/satchel-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod coerce;
mod context;
mod error;
mod extractor;
mod field;

pub use coerce::{coerce, CoercionError};
pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use error::{ExtractionError, ExtractionSource};
pub use extractor::extract;
pub use field::{FieldDescriptor, FieldKind, FieldValue, FromFieldValue, SourceDescriptor};
