//! # Satchel
//!
//! **Declarative props binding for HTTP handlers**
//!
//! A handler declares what it needs from a request through the fields of one
//! *props* struct, and how it answers through its return type. Satchel
//! checks both once, when the handler is registered, and then hydrates a
//! fresh props value for every request.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use satchel::prelude::*;
//!
//! #[derive(Debug, Clone, Default, Props)]
//! #[props(crate = "satchel::core")]
//! struct UserProps {
//!     #[param(query = "UserID")]
//!     user_id: String,
//!     #[param("Active")]
//!     active: bool,
//! }
//!
//! fn show_user(props: UserProps) -> BasicResponder {
//!     if !props.active {
//!         return not_found(format!("no active user {}", props.user_id));
//!     }
//!     ok().with_body(props.user_id)
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().with_env_prefix("SATCHEL").load()?;
//!     satchel::telemetry::init_logging(&config.log_config())?;
//!
//!     let endpoint = bind(show_user).with_config(config.bind_config());
//!     Server::new(config.server_config(), endpoint).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Return shapes
//!
//! | Return type | Behaviour |
//! |-------------|-----------|
//! | `()` | The handler writes through `RequestContext::writer()` |
//! | `Result<(), E>` | `Err(e)` answers 500 with `e` as the body |
//! | `BasicResponder`, `Box<dyn Responder>`, `Option<R>` | Status, headers and body come from the responder |
//!
//! A request whose values cannot be bound is answered with 400 and the
//! reason, or as configured by [`BindConfig`](core::BindConfig).
//!
//! The derive macro refers to `satchel_core` by default; crates depending
//! only on this facade add `#[props(crate = "satchel::core")]`.

#![doc(html_root_url = "https://docs.rs/satchel/0.1.0")]

pub use satchel_config as config;
pub use satchel_core as core;
pub use satchel_extract as extract;
pub use satchel_server as server;
pub use satchel_telemetry as telemetry;

pub use satchel_macros::Props;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use satchel_core::{
        bad_request, bind, forbidden, generate_handler, internal_server_error, not_found, ok,
        unauthorized, BasicResponder, BindConfig, BindingError, Endpoint, Props, PropsHandler,
        RequestContext, RequestId, Responder, ResponseSink,
    };

    pub use satchel_macros::Props;

    pub use satchel_config::{ConfigLoader, SatchelConfig};
    pub use satchel_server::{Server, ServerConfig, ShutdownSignal};
}
