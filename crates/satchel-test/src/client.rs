//! In-memory test client.

use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use satchel_core::{BufferedResponse, Endpoint};
use serde::Serialize;

use crate::error::TestError;
use crate::response::TestResponse;

/// A client that serves requests directly through an [`Endpoint`].
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use satchel_core::ResponseSink;
/// use satchel_test::TestClient;
/// use std::io::Write;
///
/// fn path(sink: &mut dyn ResponseSink, request: &http::Request<Bytes>) {
///     let _ = sink.write_all(request.uri().path().as_bytes());
/// }
///
/// let client = TestClient::new(path);
/// client.get("/users").send().assert_status_code(200).assert_body("/users");
/// ```
#[derive(Clone)]
pub struct TestClient {
    endpoint: Arc<dyn Endpoint>,
    default_headers: HeaderMap,
}

impl TestClient {
    /// Creates a client for `endpoint`.
    pub fn new<E: Endpoint>(endpoint: E) -> Self {
        Self::from_shared(Arc::new(endpoint))
    }

    /// Creates a client for an already shared endpoint.
    pub fn from_shared(endpoint: Arc<dyn Endpoint>) -> Self {
        Self {
            endpoint,
            default_headers: HeaderMap::new(),
        }
    }

    /// Adds a header sent with every request.
    ///
    /// # Panics
    ///
    /// Panics if the name or value is not a valid header.
    #[must_use]
    pub fn with_default_header(mut self, name: &str, value: &str) -> Self {
        let (name, value) = parse_header(name, value).unwrap_or_else(|e| panic!("{e}"));
        self.default_headers.insert(name, value);
        self
    }

    /// Starts a GET request.
    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: &str) -> TestRequest<'_> {
        TestRequest {
            client: self,
            method,
            uri: uri.to_string(),
            query: Vec::new(),
            headers: self.default_headers.clone(),
            body: Bytes::new(),
            error: None,
        }
    }

    fn execute(&self, request: &http::Request<Bytes>) -> TestResponse {
        let mut sink = BufferedResponse::new();
        self.endpoint.serve(&mut sink, request);
        TestResponse::from_http(sink.into_http())
    }
}

impl std::fmt::Debug for TestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestClient")
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

/// A request being built by a [`TestClient`].
///
/// Invalid input is reported when the request is sent.
#[must_use]
#[derive(Debug)]
pub struct TestRequest<'a> {
    client: &'a TestClient,
    method: Method,
    uri: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequest<'_> {
    /// Appends a query parameter, percent-encoded.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets a header, replacing earlier values.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match parse_header(name, value) {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(e) => self.fail(e),
        }
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and its content type.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.body = Bytes::from(bytes);
                self.headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            Err(e) => self.fail(TestError::Json(e)),
        }
        self
    }

    /// Builds the `http::Request` that would be sent.
    pub fn build(self) -> Result<http::Request<Bytes>, TestError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let uri = if self.query.is_empty() {
            self.uri
        } else {
            let encoded = serde_urlencoded::to_string(&self.query)
                .map_err(|e| TestError::RequestBuild(format!("Invalid query: {e}")))?;
            let separator = if self.uri.contains('?') { '&' } else { '?' };
            format!("{}{separator}{encoded}", self.uri)
        };

        let mut request = http::Request::builder()
            .method(self.method)
            .uri(uri)
            .body(self.body)
            .map_err(|e| TestError::RequestBuild(e.to_string()))?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }

    /// Serves the request.
    pub fn try_send(self) -> Result<TestResponse, TestError> {
        let client = self.client;
        let request = self.build()?;
        Ok(client.execute(&request))
    }

    /// Serves the request.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built.
    pub fn send(self) -> TestResponse {
        self.try_send().unwrap_or_else(|e| panic!("{e}"))
    }

    fn fail(&mut self, err: TestError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), TestError> {
    let name = HeaderName::try_from(name)
        .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_core::ResponseSink;
    use std::io::Write;

    fn echo_uri(sink: &mut dyn ResponseSink, request: &http::Request<Bytes>) {
        let _ = write!(sink, "{} {}", request.method(), request.uri());
    }

    fn echo_body(sink: &mut dyn ResponseSink, request: &http::Request<Bytes>) {
        if let Some(value) = request.headers().get(CONTENT_TYPE) {
            sink.headers_mut().insert(CONTENT_TYPE, value.clone());
        }
        let _ = sink.write_all(request.body());
    }

    #[test]
    fn test_query_is_encoded() {
        let client = TestClient::new(echo_uri);
        client
            .get("/search")
            .query("q", "a b&c")
            .query("page", 2)
            .send()
            .assert_body("GET /search?q=a+b%26c&page=2");
    }

    #[test]
    fn test_query_appends_to_existing() {
        let client = TestClient::new(echo_uri);
        client
            .delete("/items?id=1")
            .query("force", true)
            .send()
            .assert_body("DELETE /items?id=1&force=true");
    }

    #[test]
    fn test_json_body() {
        let client = TestClient::new(echo_body);
        let response = client
            .post("/users")
            .json(&serde_json::json!({"name": "Alice"}))
            .send();

        response.assert_header("content-type", "application/json");
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["name"], "Alice");
    }

    #[test]
    fn test_default_headers() {
        fn header(sink: &mut dyn ResponseSink, request: &http::Request<Bytes>) {
            let value = request
                .headers()
                .get("x-tenant")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none");
            let _ = sink.write_all(value.as_bytes());
        }

        let client = TestClient::new(header).with_default_header("x-tenant", "acme");
        client.get("/").send().assert_body("acme");
        client
            .put("/")
            .header("x-tenant", "other")
            .send()
            .assert_body("other");
    }

    #[test]
    fn test_invalid_header_is_reported_on_send() {
        let client = TestClient::new(echo_uri);
        let err = client
            .get("/")
            .header("bad header", "x")
            .try_send()
            .unwrap_err();
        assert!(matches!(err, TestError::InvalidHeader(_)));
    }

    #[test]
    fn test_invalid_uri_is_reported_on_send() {
        let client = TestClient::new(echo_uri);
        let err = client.get("not a uri").try_send().unwrap_err();
        assert!(matches!(err, TestError::RequestBuild(_)));
    }
}
