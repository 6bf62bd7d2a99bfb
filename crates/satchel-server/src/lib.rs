//! # Satchel Server
//!
//! HTTP/1.1 hosting for Satchel endpoints.
//!
//! The server accepts connections with Hyper, collects each request body up
//! to a configured limit and runs the endpoint on the blocking pool with an
//! in-memory response sink. Shutdown drains in-flight connections up to the
//! configured timeout.
//!
//! ## Example
//!
//! ```rust,ignore
//! use satchel_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), satchel_server::ServerError> {
//!     let endpoint = satchel_core::bind(list_users);
//!     let config = ServerConfig::builder().http_addr("127.0.0.1:3000").build();
//!
//!     Server::new(config, endpoint).run().await
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/satchel-server/0.1.0")]

mod config;
mod error;
mod server;
pub mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use error::ServerError;
pub use server::{BoundServer, Server};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
