//! Test response wrapper.

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A served response with helpers for assertions.
#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Wraps an `http::Response`.
    pub fn from_http(response: http::Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns true if the status is successful (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_slice(&self.body).map_err(TestError::Json)
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {} with body {:?}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts the status code as a u16.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    #[track_caller]
    pub fn assert_status_code(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "Expected status {}, got {}",
            expected,
            self.status.as_u16()
        );
        self
    }

    /// Asserts that the body equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body differs.
    #[track_caller]
    pub fn assert_body(&self, expected: impl AsRef<[u8]>) -> &Self {
        let expected = expected.as_ref();
        assert!(
            self.body.as_ref() == expected,
            "Expected body {:?}, got {:?}",
            String::from_utf8_lossy(expected),
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts that the body contains `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body does not contain the substring.
    #[track_caller]
    pub fn assert_body_contains(&self, expected: &str) -> &Self {
        let body = String::from_utf8_lossy(&self.body);
        assert!(
            body.contains(expected),
            "Body should contain '{}', got: {}",
            expected,
            body
        );
        self
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    #[track_caller]
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(
            actual, expected,
            "Header '{}': expected '{}', got '{}'",
            name, expected, actual
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: &'static str) -> TestResponse {
        let mut response = http::Response::new(Bytes::from_static(body.as_bytes()));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert("x-request", HeaderValue::from_static("42"));
        TestResponse::from_http(response)
    }

    #[test]
    fn test_accessors() {
        let response = response(StatusCode::CREATED, "done");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.status_code(), 201);
        assert!(response.is_success());
        assert_eq!(response.header_str("x-request"), Some("42"));
        assert_eq!(response.text().unwrap(), "done");
    }

    #[test]
    fn test_chained_assertions() {
        response(StatusCode::UNAUTHORIZED, "bad thing happened :(")
            .assert_status(StatusCode::UNAUTHORIZED)
            .assert_status_code(401)
            .assert_body("bad thing happened :(")
            .assert_body_contains("happened")
            .assert_header("x-request", "42");
    }

    #[test]
    #[should_panic(expected = "Expected status 200 OK, got 500")]
    fn test_assert_status_failure() {
        response(StatusCode::INTERNAL_SERVER_ERROR, "boom").assert_status(StatusCode::OK);
    }

    #[test]
    #[should_panic(expected = "Header 'x-missing' not found")]
    fn test_assert_header_missing() {
        response(StatusCode::OK, "").assert_header("x-missing", "1");
    }

    #[test]
    fn test_json_error() {
        let err = response(StatusCode::OK, "not json")
            .json::<serde_json::Value>()
            .unwrap_err();
        assert!(matches!(err, TestError::Json(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let response = TestResponse::from_http(http::Response::new(Bytes::from_static(&[0xff])));
        assert!(matches!(response.text(), Err(TestError::BodyRead(_))));
    }
}
