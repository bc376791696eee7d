//! Masking of sensitive request-body fields before they reach the logs.

use serde_json::Value;

const MASK: &str = "*****";

/// Field names whose values are masked. Matching is case-sensitive and exact.
const SENSITIVE_FIELDS: &[&str] = &["api_key", "key", "secret", "password", "token"];

/// Returns a copy of `value` with sensitive fields masked, recursing through
/// nested objects and arrays so a `settings.password` is caught as well as a
/// top-level one. Null values stay null; there is nothing to leak.
pub(crate) fn mask_sensitive(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    if SENSITIVE_FIELDS.contains(&key.as_str()) && !val.is_null() {
                        (key.clone(), Value::String(MASK.to_string()))
                    } else {
                        (key.clone(), mask_sensitive(val))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(mask_sensitive).collect()),
        other => other.clone(),
    }
}
