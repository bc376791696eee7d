//! Normalization of heterogeneous collection payloads into one page shape.
//!
//! The service answers list endpoints in two shapes: a bare JSON array of
//! records, or an envelope object with `results`, `total`, `next`, and
//! `previous`. [`Page::from_payload`] folds both into a single [`Page`] so
//! callers never see the difference.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// One page of a listed collection.
///
/// For bare-array payloads `total` equals the item count and both cursors are
/// absent; that is a degraded-but-valid pagination state, not an error.
///
/// # Examples
///
/// ```
/// use appoint::Page;
/// use serde_json::json;
///
/// #[derive(serde::Deserialize)]
/// struct Record { id: u64 }
///
/// let payload = json!({"results": [{"id": 1}], "total": 5, "next": "p2", "previous": null});
/// let page: Page<Record> = Page::from_payload(&payload);
///
/// assert_eq!(page.items.len(), 1);
/// assert_eq!(page.total, 5);
/// assert_eq!(page.next.as_deref(), Some("p2"));
/// assert!(page.previous.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The page's records, in server order.
    pub items: Vec<T>,
    /// Total records across all pages, or the count on this page when the
    /// server provided no envelope.
    pub total: u64,
    /// Opaque server-controlled cursor for the next page.
    pub next: Option<String>,
    /// Opaque server-controlled cursor for the previous page.
    pub previous: Option<String>,
}

impl<T> Page<T> {
    /// An empty page: no items, no cursors.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            next: None,
            previous: None,
        }
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Normalizes a raw decoded payload into a page.
    ///
    /// Array payloads decode element-wise with no cursors; envelope payloads
    /// read `results`/`total`/`next`/`previous`; anything else (including
    /// null) yields an empty page rather than an error. Records that fail to
    /// decode are skipped with a logged warning so one malformed row cannot
    /// hide the rest of a legitimate page.
    ///
    /// This is a pure function of the payload: normalizing the same payload
    /// twice yields structurally equal pages.
    pub fn from_payload(payload: &Value) -> Self {
        match payload {
            Value::Array(items) => {
                let items = decode_items(items);
                Self {
                    total: items.len() as u64,
                    items,
                    next: None,
                    previous: None,
                }
            }
            Value::Object(map) => {
                let items = match map.get("results").and_then(Value::as_array) {
                    Some(results) => decode_items(results),
                    None => Vec::new(),
                };
                let total = map
                    .get("total")
                    .and_then(Value::as_u64)
                    .unwrap_or(items.len() as u64);
                Self {
                    items,
                    total,
                    next: cursor(map.get("next")),
                    previous: cursor(map.get("previous")),
                }
            }
            _ => Self::empty(),
        }
    }
}

fn decode_items<T: DeserializeOwned>(values: &[Value]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| match serde_json::from_value(value.clone()) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(error = %err, "skipping record that failed to decode");
                None
            }
        })
        .collect()
}

/// Cursors pass through verbatim and are never interpreted.
fn cursor(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}
