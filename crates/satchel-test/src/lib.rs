//! # Satchel Test
//!
//! In-memory testing for Satchel endpoints. Requests are served directly
//! into a [`BufferedResponse`](satchel_core::BufferedResponse) without a
//! socket or an async runtime.
//!
//! ## Example
//!
//! ```ignore
//! use satchel_test::TestClient;
//!
//! let client = TestClient::new(satchel_core::bind(show_user));
//!
//! client
//!     .get("/users")
//!     .query("UserID", "user1")
//!     .query("Active", "true")
//!     .send()
//!     .assert_status(http::StatusCode::OK)
//!     .assert_body("user1");
//! ```

#![doc(html_root_url = "https://docs.rs/satchel-test/0.1.0")]

mod client;
mod error;
mod response;

pub use client::{TestClient, TestRequest};
pub use error::TestError;
pub use response::TestResponse;
