//! Responders: values that describe a complete response.
//!
//! A handler returning a [`Responder`] lets the dispatcher write the status,
//! headers and body for it. [`BasicResponder`] covers the common cases and
//! the free functions in this module build the usual error responses.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::fmt;
use std::io::{Cursor, Read};

/// A value that can be written out as an HTTP response.
///
/// The body is a one-shot stream: [`Responder::take_body`] hands it over
/// once. When a responder has no body, its error text (if any) is written
/// instead.
pub trait Responder: Send {
    /// Response status.
    fn status(&self) -> StatusCode;

    /// Headers to copy into the response, if any.
    fn headers(&self) -> Option<&HeaderMap> {
        None
    }

    /// Takes the body stream, if any.
    fn take_body(&mut self) -> Option<Box<dyn Read + Send>> {
        None
    }

    /// Error text describing the response, if any.
    fn error_text(&self) -> Option<String> {
        None
    }
}

impl<R> Responder for Box<R>
where
    R: Responder + ?Sized,
{
    fn status(&self) -> StatusCode {
        (**self).status()
    }

    fn headers(&self) -> Option<&HeaderMap> {
        (**self).headers()
    }

    fn take_body(&mut self) -> Option<Box<dyn Read + Send>> {
        (**self).take_body()
    }

    fn error_text(&self) -> Option<String> {
        (**self).error_text()
    }
}

/// A status, optional headers, an optional in-memory body and optional
/// error text.
///
/// # Example
///
/// ```
/// use satchel_core::{BasicResponder, Responder};
/// use http::{header, HeaderValue, StatusCode};
///
/// let responder = BasicResponder::new(StatusCode::CREATED)
///     .with_header(header::LOCATION, HeaderValue::from_static("/users/42"))
///     .with_body("created");
///
/// assert_eq!(responder.status(), StatusCode::CREATED);
/// assert!(responder.headers().is_some());
/// ```
#[derive(Clone)]
pub struct BasicResponder {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Bytes>,
    error_text: Option<String>,
}

impl BasicResponder {
    /// Creates a responder with the given status and nothing else.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
            error_text: None,
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the error text, written when there is no body.
    #[must_use]
    pub fn with_error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = Some(text.into());
        self
    }

    /// Returns the body bytes, if a body is set and has not been taken.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

impl Default for BasicResponder {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl fmt::Debug for BasicResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicResponder")
            .field("status", &self.status)
            .field("headers", &self.headers.len())
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("error_text", &self.error_text)
            .finish()
    }
}

impl Responder for BasicResponder {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&self) -> Option<&HeaderMap> {
        if self.headers.is_empty() {
            None
        } else {
            Some(&self.headers)
        }
    }

    fn take_body(&mut self) -> Option<Box<dyn Read + Send>> {
        self.body
            .take()
            .map(|body| Box::new(Cursor::new(body)) as Box<dyn Read + Send>)
    }

    fn error_text(&self) -> Option<String> {
        self.error_text.clone()
    }
}

/// 200 OK with no body.
#[must_use]
pub fn ok() -> BasicResponder {
    BasicResponder::new(StatusCode::OK)
}

fn error_responder(status: StatusCode, e: &dyn fmt::Display) -> BasicResponder {
    BasicResponder::new(status).with_body(e.to_string())
}

/// 500 Internal Server Error with `e` as the body.
#[must_use]
pub fn internal_server_error(e: impl fmt::Display) -> BasicResponder {
    error_responder(StatusCode::INTERNAL_SERVER_ERROR, &e)
}

/// 401 Unauthorized with `e` as the body.
#[must_use]
pub fn unauthorized(e: impl fmt::Display) -> BasicResponder {
    error_responder(StatusCode::UNAUTHORIZED, &e)
}

/// 403 Forbidden with `e` as the body.
#[must_use]
pub fn forbidden(e: impl fmt::Display) -> BasicResponder {
    error_responder(StatusCode::FORBIDDEN, &e)
}

/// 404 Not Found with `e` as the body.
#[must_use]
pub fn not_found(e: impl fmt::Display) -> BasicResponder {
    error_responder(StatusCode::NOT_FOUND, &e)
}

/// 400 Bad Request with `e` as the body.
#[must_use]
pub fn bad_request(e: impl fmt::Display) -> BasicResponder {
    error_responder(StatusCode::BAD_REQUEST, &e)
}
