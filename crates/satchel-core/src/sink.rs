//! Response sinks.
//!
//! A [`ResponseSink`] is the outbound side of one request: a status that can
//! be set once, a header map, and a byte stream.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use std::io::{self, Write};
use tracing::warn;

/// Writable response for one request.
///
/// Writing body bytes before calling [`ResponseSink::set_status`] commits
/// the status as 200, the way HTTP transports do.
pub trait ResponseSink: Write + Send {
    /// Sets the status. Only the first call has an effect.
    fn set_status(&mut self, status: StatusCode);

    /// Returns the current status (200 until one is set).
    fn status(&self) -> StatusCode;

    /// Returns the response headers for modification.
    fn headers_mut(&mut self) -> &mut HeaderMap;
}

/// In-memory response sink.
///
/// # Example
///
/// ```
/// use satchel_core::{BufferedResponse, ResponseSink};
/// use http::StatusCode;
/// use std::io::Write;
///
/// let mut response = BufferedResponse::new();
/// response.set_status(StatusCode::ACCEPTED);
/// response.set_status(StatusCode::OK);
/// response.write_all(b"queued").unwrap();
///
/// assert_eq!(response.status(), StatusCode::ACCEPTED);
/// assert_eq!(response.body(), b"queued");
/// ```
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    /// Creates an empty response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once a status has been set or body bytes written.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    /// Returns the current status (200 until one is set).
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts into an `http::Response`.
    #[must_use]
    pub fn into_http(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(Bytes::from(self.body));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for BufferedResponse {
    fn set_status(&mut self, status: StatusCode) {
        match self.status {
            None => self.status = Some(status),
            Some(current) => {
                warn!(
                    current = current.as_u16(),
                    ignored = status.as_u16(),
                    "response status already set"
                );
            }
        }
    }

    fn status(&self) -> StatusCode {
        Self::status(self)
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

impl Write for BufferedResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() && !buf.is_empty() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
