//! Request context types.
//!
//! The [`RequestContext`] is the optional first handler parameter. It is
//! recognised by its type, so it can be named anything in the handler.

use crate::ResponseSink;
use satchel_extract::ExtractionContext;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps log lines for consecutive requests
/// sorted.
///
/// # Example
///
/// ```
/// use satchel_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-request context handed to handlers that declare it.
///
/// It carries the request id, read access to the inbound request and, only
/// for handlers that return nothing, the response writer. For every other
/// handler the dispatcher owns the writer and [`RequestContext::writer`]
/// returns `None`.
pub struct RequestContext<'a> {
    request_id: RequestId,
    request: &'a ExtractionContext,
    writer: Option<&'a mut dyn ResponseSink>,
}

impl<'a> RequestContext<'a> {
    /// Creates a context.
    #[must_use]
    pub fn new(
        request_id: RequestId,
        request: &'a ExtractionContext,
        writer: Option<&'a mut dyn ResponseSink>,
    ) -> Self {
        Self {
            request_id,
            request,
            writer,
        }
    }

    /// Returns the request id.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the inbound request.
    #[must_use]
    pub const fn request(&self) -> &'a ExtractionContext {
        self.request
    }

    /// Returns `true` if this context carries the response writer.
    #[must_use]
    pub const fn has_writer(&self) -> bool {
        self.writer.is_some()
    }

    /// Borrows the response writer, if this handler owns it.
    pub fn writer(&mut self) -> Option<&mut (dyn ResponseSink + 'a)> {
        self.writer.as_deref_mut()
    }

    /// Takes the response writer out of the context.
    pub fn take_writer(&mut self) -> Option<&'a mut dyn ResponseSink> {
        self.writer.take()
    }
}

impl std::fmt::Debug for RequestContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("has_writer", &self.has_writer())
            .finish()
    }
}
