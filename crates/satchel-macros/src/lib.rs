//! Procedural macros for Satchel props.
//!
//! # Overview
//!
//! `#[derive(Props)]` implements `satchel_core::Props` for a struct with
//! named fields. Each field becomes one field descriptor, in declaration
//! order, whose kind is decided from the field's type:
//!
//! | Field type | Kind |
//! |------------|------|
//! | `bool`, `i8`..`i64`, `isize`, `u8`..`u64`, `usize`, `f32`, `f64` | scalar |
//! | `String` | text |
//! | `Vec<u8>`, `Bytes` | bytes |
//! | any other path type | nested structure (rejected when the plan is built) |
//! | references, tuples, arrays, function pointers | unsupported (rejected when the plan is built) |
//!
//! # Example
//!
//! ```rust,ignore
//! use satchel::prelude::*;
//!
//! #[derive(Debug, Clone, Default, Props)]
//! struct UserProps {
//!     #[param(query = "UserID")]
//!     user_id: String,
//!     #[param("Active")]
//!     active: bool,
//! }
//! ```
//!
//! The struct must also implement `Default` and `Clone`.

mod parse;
mod props;

use proc_macro::TokenStream;

/// Derives `satchel_core::Props`.
///
/// # Field attributes
///
/// - `#[param(query = "Key")]` binds the field to the query parameter `Key`
/// - `#[param("Key")]` is the short form of the same
///
/// A field without `#[param]` has no source, and binding a handler that uses
/// the struct fails with a missing-source error.
///
/// # Container attributes
///
/// - `#[props(crate = "path")]` sets the path to `satchel-core` used in the
///   generated code. Defaults to `::satchel_core`; use `"satchel::core"` when
///   depending on the facade crate only.
#[proc_macro_derive(Props, attributes(param, props))]
pub fn derive_props(input: TokenStream) -> TokenStream {
    props::expand_props(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
