//! Error taxonomy for API calls.
//!
//! Every failure surfaces as an [`ApiError`] carrying a closed [`ErrorKind`],
//! the HTTP status (when a response was received), a human-readable message
//! extracted from the response body, the raw decoded body, and the request id
//! the server echoed back. Callers branch on [`ApiError::kind`] rather than on
//! error type identity.

use std::time::{Duration, SystemTime};

use http::{HeaderMap, StatusCode};
use serde_json::Value;

/// The failure class of an [`ApiError`].
///
/// The kind is derived mechanically from the response status code (or from the
/// transport failure when no response was received) and is never assigned ad
/// hoc. See [`ApiError::classify`] for the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Authentication failed (HTTP 401).
    Authentication,
    /// The resource does not exist (HTTP 404).
    NotFound,
    /// The request was rejected as invalid (HTTP 400), or could not be built
    /// client-side in the first place.
    Validation,
    /// The server refused the request due to rate limiting (HTTP 429).
    RateLimited,
    /// The server failed (HTTP 500-599).
    ServerError,
    /// No HTTP response was received: connection refused, DNS failure,
    /// timeout, or the client was closed.
    Transport,
    /// Anything else: unexpected status codes and protocol violations such as
    /// a success response whose body is not valid JSON.
    Unknown,
}

impl ErrorKind {
    /// Whether errors of this kind are worth retrying.
    ///
    /// Rate limits, server errors, and transport failures are transient;
    /// everything else will fail the same way on a second attempt.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimited | ErrorKind::ServerError | ErrorKind::Transport
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::NotFound => "not found",
            ErrorKind::Validation => "validation",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::ServerError => "server error",
            ErrorKind::Transport => "transport",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// The error type for API calls.
///
/// Fields are private so the invariant between `kind` and the status code
/// cannot be broken; use the accessors.
///
/// # Examples
///
/// ```no_run
/// use appoint::{Client, ErrorKind};
///
/// # async fn example() -> Result<(), appoint::ApiError> {
/// let client = Client::builder()
///     .base_url("https://scheduling.example.com/api/v1")?
///     .api_key("secret")
///     .build()?;
///
/// match client.admins().get(42).await {
///     Ok(Some(admin)) => println!("found {}", admin.email),
///     Ok(None) => println!("no such admin"),
///     Err(e) if e.kind() == ErrorKind::Authentication => {
///         eprintln!("check the API key: {e}");
///     }
///     Err(e) => eprintln!("request failed: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    status: Option<StatusCode>,
    message: String,
    body: Option<Value>,
    request_id: Option<String>,
    retry_after: Option<Duration>,
}

impl ApiError {
    /// Builds the error for a non-2xx response.
    ///
    /// The kind is a pure function of the status code:
    ///
    /// | status | kind |
    /// |---|---|
    /// | 401 | `Authentication` |
    /// | 404 | `NotFound` |
    /// | 400 | `Validation` |
    /// | 429 | `RateLimited` |
    /// | 500-599 | `ServerError` |
    /// | other | `Unknown` |
    ///
    /// `body` is the JSON-decoded response body when it parsed, `raw_text` the
    /// undecoded body used as a fallback message source.
    pub fn classify(
        status: StatusCode,
        body: Option<Value>,
        raw_text: &str,
        request_id: Option<String>,
    ) -> Self {
        let kind = match status.as_u16() {
            401 => ErrorKind::Authentication,
            404 => ErrorKind::NotFound,
            400 => ErrorKind::Validation,
            429 => ErrorKind::RateLimited,
            500..=599 => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        };

        let message = match &body {
            Some(value) => extract_message(value),
            None if raw_text.is_empty() => format!("HTTP error {}", status.as_u16()),
            None => raw_text.to_string(),
        };

        Self {
            kind,
            status: Some(status),
            message,
            body,
            request_id,
            retry_after: None,
        }
    }

    /// A transport-level failure: no HTTP response was received.
    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        Self {
            kind: ErrorKind::Transport,
            status: None,
            message: err.to_string(),
            body: None,
            request_id: None,
            retry_after: None,
        }
    }

    /// A success status whose body failed to parse as JSON. This is a protocol
    /// violation by the server, not a transport failure.
    pub(crate) fn invalid_payload(
        status: StatusCode,
        raw_text: &str,
        request_id: Option<String>,
    ) -> Self {
        let excerpt: String = raw_text.chars().take(100).collect();
        Self {
            kind: ErrorKind::Unknown,
            status: Some(status),
            message: format!("invalid JSON response: {excerpt}"),
            body: None,
            request_id,
            retry_after: None,
        }
    }

    /// A successful response whose payload did not match the expected entity
    /// shape.
    pub(crate) fn decode_failure(err: &serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            status: None,
            message: format!("failed to decode response payload: {err}"),
            body: None,
            request_id: None,
            retry_after: None,
        }
    }

    /// The request could not be constructed client-side (invalid URL, header,
    /// or unserializable body). No status code applies.
    pub(crate) fn request_build(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            status: None,
            message: message.into(),
            body: None,
            request_id: None,
            retry_after: None,
        }
    }

    pub(crate) fn client_closed() -> Self {
        Self {
            kind: ErrorKind::Transport,
            status: None,
            message: "client is closed".to_string(),
            body: None,
            request_id: None,
            retry_after: None,
        }
    }

    pub(crate) fn set_retry_after(&mut self, retry_after: Option<Duration>) {
        self.retry_after = retry_after;
    }

    /// The failure class. Branch on this, never on the message text.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The HTTP status code, or `None` for pure transport failures.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The human-readable message extracted from the response.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The JSON-decoded response body, when one was received and parsed.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The request id the server echoed in `X-Request-ID`, when present.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// The server-directed wait parsed from a `Retry-After` header on a 429
    /// response. The retry loop prefers this over the computed backoff.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// Shorthand for `self.kind().is_retryable()`.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Extracts a human-readable message from a JSON-decoded error body.
///
/// Priority, first match wins: non-empty array joined with `"; "`; a `message`
/// key; an `error` key; field-level validation errors rendered as
/// `"field: e1, e2"` joined with `"; "`; otherwise the stringified body.
fn extract_message(body: &Value) -> String {
    match body {
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(map) => {
            if let Some(message) = map.get("message") {
                return value_to_string(message);
            }
            if let Some(error) = map.get("error") {
                return value_to_string(error);
            }
            if map.values().any(Value::is_array) {
                return map
                    .iter()
                    .map(|(field, errors)| match errors {
                        Value::Array(items) => {
                            let joined = items
                                .iter()
                                .map(value_to_string)
                                .collect::<Vec<_>>()
                                .join(", ");
                            format!("{field}: {joined}")
                        }
                        other => format!("{field}: {}", value_to_string(other)),
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
            }
            body.to_string()
        }
        other => value_to_string(other),
    }
}

/// Strings render without quotes; everything else as compact JSON.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parses a `Retry-After` response header, in either delay-seconds or
/// HTTP-date form.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get("retry-after")?.to_str().ok()?;

    if let Ok(seconds) = header.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    if let Ok(date_time) = httpdate::parse_http_date(header) {
        if let Ok(duration) = date_time.duration_since(SystemTime::now()) {
            return Some(duration);
        }
    }

    None
}

/// A specialized `Result` type for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;
