//! # Satchel Core
//!
//! Binding plans, hydration and dispatch for props-declaring handlers.
//!
//! A handler states what it needs from a request through one *props*
//! parameter and how it answers through its return type:
//!
//! - [`Props`] - Explicit field schema of a props type (usually derived)
//! - [`Handler`] - Implemented for `fn(RequestContext, P) -> R` and `fn(P) -> R`
//! - [`HandlerOutput`] - Return shapes: `()`, `Result<(), E>`, responders
//! - [`BindingPlan`] - Registration-time analysis, built once per handler
//! - [`hydrate`] / [`dispatch`] - Per-request binding and response writing
//! - [`generate_handler`] - Produces a [`PropsHandler`] usable as an [`Endpoint`]
//!
//! ## Example
//!
//! ```rust
//! use satchel_core::{generate_handler, BufferedResponse, Endpoint, RequestContext};
//! use bytes::Bytes;
//! use std::io::Write;
//!
//! fn health(mut ctx: RequestContext<'_>, _props: ()) {
//!     if let Some(writer) = ctx.writer() {
//!         let _ = writer.write_all(b"ok");
//!     }
//! }
//!
//! let endpoint = generate_handler(health).expect("valid handler");
//!
//! let request = http::Request::get("/health").body(Bytes::new()).unwrap();
//! let mut response = BufferedResponse::new();
//! endpoint.serve(&mut response, &request);
//!
//! assert_eq!(response.status(), http::StatusCode::OK);
//! assert_eq!(response.body(), b"ok");
//! ```

#![doc(html_root_url = "https://docs.rs/satchel-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod context;
mod dispatch;
mod error;
pub mod fixtures;
mod handler;
mod hydrate;
mod output;
mod plan;
mod responder;
mod schema;
mod sink;

pub use config::BindConfig;
pub use context::{RequestContext, RequestId};
pub use dispatch::{dispatch, reject};
pub use error::BindingError;
pub use handler::{bind, generate_handler, Endpoint, Handler, PropsHandler, PropsOnly, WithContext};
pub use hydrate::hydrate;
pub use output::{Capabilities, HandlerOutput, ReturnShape, ReturnStrategy, Returned};
pub use plan::BindingPlan;
pub use responder::{
    bad_request, forbidden, internal_server_error, not_found, ok, unauthorized, BasicResponder,
    Responder,
};
pub use schema::Props;
pub use sink::{BufferedResponse, ResponseSink};

// Re-exported for code generated by `#[derive(Props)]`.
pub use satchel_extract::{
    ExtractionContext, ExtractionError, FieldDescriptor, FieldKind, FieldValue, FromFieldValue,
    SourceDescriptor,
};
