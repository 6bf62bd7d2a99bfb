//! Extraction context providing access to request data.
//!
//! The [`ExtractionContext`] is the request abstraction the binding engine
//! reads from. Query parameters are decoded once when the context is built.

use bytes::Bytes;
use http::{HeaderMap, Method, Request, Uri};
use std::collections::HashMap;

/// Read-only view of one inbound request.
///
/// # Example
///
/// ```rust
/// use satchel_extract::ExtractionContext;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let ctx = ExtractionContext::new(
///     Method::GET,
///     Uri::from_static("/users?UserID=user1&page=2"),
///     HeaderMap::new(),
///     Bytes::new(),
/// );
///
/// assert_eq!(ctx.query_param("UserID"), Some("user1"));
/// assert_eq!(ctx.query_param("missing"), None);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    query: HashMap<String, String>,
}

impl ExtractionContext {
    /// Creates a new extraction context.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        let query = parse_query(uri.query());
        Self {
            method,
            uri,
            headers,
            body,
            query,
        }
    }

    /// Creates a context from an `http::Request`.
    ///
    /// The body is reference-counted, so this does not copy payload bytes.
    #[must_use]
    pub fn from_request(request: &Request<Bytes>) -> Self {
        Self::new(
            request.method().clone(),
            request.uri().clone(),
            request.headers().clone(),
            request.body().clone(),
        )
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the raw query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the decoded value of a query parameter.
    ///
    /// When a key appears more than once, the last occurrence wins.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Returns all decoded query parameters.
    #[must_use]
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Checks if the request body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }
}

fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let Some(query) = query else {
        return HashMap::new();
    };
    // Pairs arrive in order, so collecting keeps the last value per key.
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .map(|pairs| pairs.into_iter().collect())
        .unwrap_or_default()
}

/// Builder for constructing an `ExtractionContext`.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
}

impl ExtractionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method. Defaults to `GET`.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI. Defaults to `/`.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Adds a single header. Invalid values are skipped.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the extraction context.
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        ExtractionContext::new(
            self.method.unwrap_or(Method::GET),
            self.uri.unwrap_or_else(|| Uri::from_static("/")),
            self.headers,
            self.body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ctx(uri: &'static str) -> ExtractionContext {
        ExtractionContextBuilder::new().uri(Uri::from_static(uri)).build()
    }

    #[test]
    fn test_context_from_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/users/42?active=true")
            .header("content-type", "text/plain")
            .body(Bytes::from_static(b"payload"))
            .unwrap();

        let ctx = ExtractionContext::from_request(&request);

        assert_eq!(ctx.method(), &Method::POST);
        assert_eq!(ctx.path(), "/users/42");
        assert_eq!(ctx.query_string(), Some("active=true"));
        assert_eq!(ctx.query_param("active"), Some("true"));
        assert_eq!(ctx.header("content-type"), Some("text/plain"));
        assert_eq!(ctx.body(), &Bytes::from_static(b"payload"));
        assert!(!ctx.is_body_empty());
    }

    #[test]
    fn test_no_query() {
        let ctx = make_ctx("/users");
        assert!(ctx.query_params().is_empty());
        assert_eq!(ctx.query_param("UserID"), None);
    }

    #[test]
    fn test_last_value_wins() {
        let ctx = make_ctx("/?tag=a&tag=b&tag=c");
        assert_eq!(ctx.query_param("tag"), Some("c"));
        assert_eq!(ctx.query_params().len(), 1);
    }

    #[test]
    fn test_percent_and_plus_decoding() {
        let ctx = make_ctx("/search?q=rust%2Blang&name=Hello+World&empty=");
        assert_eq!(ctx.query_param("q"), Some("rust+lang"));
        assert_eq!(ctx.query_param("name"), Some("Hello World"));
        assert_eq!(ctx.query_param("empty"), Some(""));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let ctx = make_ctx("/?UserID=user1");
        assert_eq!(ctx.query_param("UserID"), Some("user1"));
        assert_eq!(ctx.query_param("userid"), None);
    }

    #[test]
    fn test_builder_defaults() {
        let ctx = ExtractionContextBuilder::new().build();
        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/");
        assert!(ctx.is_body_empty());
    }
}
