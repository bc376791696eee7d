//! Per-resource endpoint wrappers.
//!
//! Each wrapper borrows the [`Client`](crate::Client) and delegates to
//! [`Client::execute`](crate::Client::execute): it supplies a path, query
//! parameters, and a body, and gets back a raw payload or an
//! [`ApiError`](crate::ApiError). Idempotent lookups translate a `NotFound`
//! into `Ok(None)`; mutating operations always propagate errors.

mod admins;
mod appointments;
mod availabilities;
mod customers;
mod providers;

pub use admins::Admins;
pub use appointments::Appointments;
pub use availabilities::Availabilities;
pub use customers::Customers;
pub use providers::Providers;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ErrorKind, Result};
use crate::request::ApiRequest;

/// Common query parameters for list endpoints.
///
/// Out-of-range values are clamped when the request is built: `page` to at
/// least 1, `length` to 1..=100.
///
/// # Examples
///
/// ```
/// use appoint::ListParams;
///
/// let params = ListParams::default().page(2).length(25).sort("email");
/// let newest_first = ListParams::default().sort("-id");
/// ```
#[derive(Debug, Clone)]
pub struct ListParams {
    page: u32,
    length: u32,
    sort: String,
}

impl ListParams {
    /// Page number, 1-based.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Records per page.
    pub fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Sort field; prefix with `-` for descending order.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub(crate) fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query("page", self.page.max(1))
            .query("length", self.length.clamp(1, 100))
            .query("sort", &self.sort)
    }
}

impl Default for ListParams {
    /// First page, ten records, newest first.
    fn default() -> Self {
        Self {
            page: 1,
            length: 10,
            sort: "-id".to_string(),
        }
    }
}

/// Decodes a raw payload into an entity, mapping shape mismatches to an
/// `Unknown`-kind error.
pub(crate) fn decode_entity<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| ApiError::decode_failure(&e))
}

/// Collapses a `NotFound` into `None` for idempotent lookups.
pub(crate) fn absent_on_not_found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
