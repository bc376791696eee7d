//! The client facade and the resilient request executor.
//!
//! [`Client`] holds the shared session state (base URL, credentials, pooled
//! transport, retry policy) behind an `Arc`, so cloning it is cheap and every
//! resource wrapper sees the same connection pool. [`Client::execute`] is the
//! single path all requests take: build, send, classify, retry, parse.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde_json::Value;
use url::Url;

use crate::error::{parse_retry_after, ApiError, Result};
use crate::redact::mask_sensitive;
use crate::request::ApiRequest;
use crate::resources::{Admins, Appointments, Availabilities, Customers, Providers};
use crate::retry::{RetryPolicy, RetryState, Sleeper, TokioSleeper};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An async client for an appointment-scheduling service's REST API.
///
/// The client is created once and reused: it owns the connection pool and the
/// session configuration, and the per-resource accessors
/// ([`admins`](Client::admins), [`providers`](Client::providers),
/// [`customers`](Client::customers), [`appointments`](Client::appointments),
/// [`availabilities`](Client::availabilities)) all borrow it.
///
/// Concurrent calls share only the pooled transport and an immutable snapshot
/// of the configuration; no locking happens at this level.
///
/// # Examples
///
/// ```no_run
/// use appoint::{Client, ListParams};
///
/// # async fn example() -> Result<(), appoint::ApiError> {
/// let client = Client::builder()
///     .base_url("https://scheduling.example.com/index.php/api/v1")?
///     .api_key(std::env::var("APPOINT_API_KEY").unwrap())
///     .build()?;
///
/// let admins = client.admins().list(ListParams::default()).await?;
/// println!("{} of {} admins", admins.len(), admins.total);
///
/// for admin in &admins.items {
///     println!("- {} {} <{}>", admin.first_name, admin.last_name, admin.email);
/// }
///
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    auth_header: HeaderValue,
    default_timeout: Duration,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    log_requests: bool,
    closed: AtomicBool,
}

impl Client {
    /// Creates a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Endpoints for admin users.
    pub fn admins(&self) -> Admins<'_> {
        Admins::new(self)
    }

    /// Endpoints for service providers.
    pub fn providers(&self) -> Providers<'_> {
        Providers::new(self)
    }

    /// Endpoints for customers.
    pub fn customers(&self) -> Customers<'_> {
        Customers::new(self)
    }

    /// Endpoints for appointments.
    pub fn appointments(&self) -> Appointments<'_> {
        Appointments::new(self)
    }

    /// Endpoints for provider availability lookups.
    pub fn availabilities(&self) -> Availabilities<'_> {
        Availabilities::new(self)
    }

    /// Executes one API call and returns the raw decoded payload.
    ///
    /// This is the core contract every resource wrapper delegates to. The
    /// descriptor is sent through the shared transport; transient failures
    /// (rate limits, 5xx, transport errors) are retried per the configured
    /// [`RetryPolicy`] with capped exponential backoff, re-issuing the same
    /// descriptor unchanged. When attempts run out, the last classified error
    /// surfaces verbatim.
    ///
    /// A 204 response yields `Value::Null`; every other success status parses
    /// the body as JSON.
    ///
    /// The per-call (or default) timeout bounds each individual attempt, not
    /// the whole retry sequence. A caller wanting an overall deadline across
    /// retries must impose its own cancellation around this future.
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(ApiError::client_closed());
        }

        let url = self.build_url(&request)?;
        let mut state = RetryState::new();

        loop {
            match self.send_once(&request, &url, state.attempt()).await {
                Ok(payload) => return Ok(payload),
                Err(err) => {
                    if !self.inner.retry.should_retry(&err, &state) {
                        if self.inner.log_requests {
                            tracing::error!(
                                error = %err,
                                attempt = state.attempt(),
                                url = %url,
                                "request failed"
                            );
                        }
                        return Err(err);
                    }

                    // A server-directed Retry-After beats the computed
                    // backoff; both are capped at the policy max.
                    let delay = match err.retry_after() {
                        Some(wait) => wait.min(self.inner.retry.max_delay()),
                        None => self.inner.retry.next_delay(&state),
                    };

                    if self.inner.log_requests {
                        tracing::warn!(
                            error = %err,
                            attempt = state.attempt(),
                            delay_ms = delay.as_millis() as u64,
                            "retrying request after delay"
                        );
                    }

                    self.inner.sleeper.sleep(delay).await;
                    state.record_wait(delay);
                }
            }
        }
    }

    /// Closes the client.
    ///
    /// In-flight calls are not cancelled, but subsequent calls fail with a
    /// `Transport`-kind error before touching the pool. The pooled connections
    /// are released once the last clone of the client is dropped.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    fn build_url(&self, request: &ApiRequest) -> Result<Url> {
        let path = request.path.strip_prefix('/').unwrap_or(&request.path);
        let mut url = Url::parse(&format!("{}/{}", self.inner.base_url, path))
            .map_err(|e| ApiError::request_build(format!("invalid request path: {e}")))?;
        for (key, value) in &request.query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// Sends one attempt and parses the outcome.
    async fn send_once(&self, request: &ApiRequest, url: &Url, attempt: u32) -> Result<Value> {
        if self.inner.log_requests {
            match &request.body {
                Some(body) => tracing::debug!(
                    method = %request.method,
                    url = %url,
                    attempt,
                    body = %mask_sensitive(body),
                    "dispatching request"
                ),
                None => tracing::debug!(
                    method = %request.method,
                    url = %url,
                    attempt,
                    "dispatching request"
                ),
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.inner.auth_header.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // Caller headers land last: last write wins, including Authorization.
        for (name, value) in &request.headers {
            headers.insert(name, value.clone());
        }

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url.clone())
            .headers(headers)
            .timeout(request.timeout.unwrap_or(self.inner.default_timeout));

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(&e))?;

        self.parse_response(response).await
    }

    async fn parse_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let headers = response.headers().clone();
        let request_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        if self.inner.log_requests {
            tracing::info!(status = status.as_u16(), "received response");
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::transport(&e))?;

        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|_| ApiError::invalid_payload(status, &text, request_id));
        }

        let body = serde_json::from_str::<Value>(&text).ok();
        let mut err = ApiError::classify(status, body, &text, request_id);
        if status == StatusCode::TOO_MANY_REQUESTS {
            err.set_retry_after(parse_retry_after(&headers));
        }
        Err(err)
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use appoint::{Client, RetryPolicy};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), appoint::ApiError> {
/// let client = Client::builder()
///     .base_url("https://scheduling.example.com/index.php/api/v1")?
///     .api_key("secret")
///     .timeout(Duration::from_secs(10))
///     .retry_policy(RetryPolicy::new(5, Duration::from_millis(500)))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    default_timeout: Duration,
    retry: RetryPolicy,
    sleeper: Option<Arc<dyn Sleeper>>,
    log_requests: bool,
}

impl ClientBuilder {
    /// Creates a builder with the defaults: 30s timeout, three total attempts
    /// with a one second base delay, request logging on.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            default_timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            sleeper: None,
            log_requests: true,
        }
    }

    /// Sets the base URL all request paths are joined onto. A trailing slash
    /// is stripped.
    ///
    /// # Errors
    ///
    /// Returns a `Validation`-kind error if the URL does not parse.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let trimmed = url.as_ref().trim_end_matches('/');
        Url::parse(trimmed)
            .map_err(|e| ApiError::request_build(format!("invalid base URL: {e}")))?;
        self.base_url = Some(trimmed.to_string());
        Ok(self)
    }

    /// Sets the API key sent as a bearer token on every request.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the default per-attempt timeout. Individual requests may override
    /// it via [`ApiRequest::timeout`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Sets the retry policy for transient failures.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Replaces the backoff sleeper. Tests use this to drive the retry loop
    /// without real delays.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Enables or disables request/response logging. Enabled by default.
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// Builds the configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns a `Validation`-kind error if the base URL or API key is
    /// missing, or if the transport cannot be constructed.
    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::request_build("base URL is required"))?;
        let api_key = self
            .api_key
            .ok_or_else(|| ApiError::request_build("API key is required"))?;

        let mut auth_header = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ApiError::request_build(format!("invalid API key: {e}")))?;
        auth_header.set_sensitive(true);

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::request_build(format!("failed to build HTTP client: {e}")))?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                auth_header,
                default_timeout: self.default_timeout,
                retry: self.retry,
                sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
                log_requests: self.log_requests,
                closed: AtomicBool::new(false),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
