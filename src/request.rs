//! Per-call request descriptors.

use std::collections::HashMap;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Everything needed to issue one API call: method, path, query parameters,
/// optional JSON body, optional timeout override, and extra headers.
///
/// Built fluently, then handed to [`Client::execute`](crate::Client::execute).
/// A descriptor is immutable once built; retries re-issue it unchanged.
///
/// # Examples
///
/// ```
/// use appoint::ApiRequest;
///
/// let request = ApiRequest::get("/appointments")
///     .query("page", 2)
///     .query("sort", "-id");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: HashMap<String, String>,
    pub(crate) body: Option<Value>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) headers: HeaderMap,
}

impl ApiRequest {
    /// Creates a descriptor with the given method and path (relative to the
    /// client's base URL).
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            body: None,
            timeout: None,
            headers: HeaderMap::new(),
        }
    }

    /// A GET request to `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request to `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT request to `path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A DELETE request to `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Adds a query parameter. Insertion order is not significant.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Sets the raw JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns a `Validation`-kind error if the value cannot be serialized.
    pub fn json<T: Serialize>(self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| {
            ApiError::request_build(format!("failed to serialize request body: {e}"))
        })?;
        Ok(self.body(value))
    }

    /// Overrides the client's default timeout for this call only. The timeout
    /// bounds each individual attempt, not the whole retry sequence.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds an extra header.
    ///
    /// Extra headers are applied after the standard set, so a caller-supplied
    /// `Authorization` replaces the client's bearer token (last write wins).
    ///
    /// # Errors
    ///
    /// Returns a `Validation`-kind error if the name or value is not a legal
    /// HTTP header.
    pub fn header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ApiError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ApiError::request_build(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ApiError::request_build(format!("invalid header value: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}
