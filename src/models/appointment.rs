//! Appointment schema.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of an appointment.
///
/// The service is loose about this field: values arrive in mixed case, empty,
/// or absent. Decoding is case-insensitive and anything unrecognized falls
/// back to `Booked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AppointmentStatus {
    #[default]
    #[serde(rename = "Booked")]
    Booked,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref().map(str::to_lowercase).as_deref() {
            Some("cancelled") => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Booked,
        })
    }
}

/// A booked (or cancelled) appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Absent when building a creation request; assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Start time, ISO 8601. Validated when decoding responses.
    #[serde(deserialize_with = "iso_8601")]
    pub start: String,
    /// End time, ISO 8601. Validated when decoding responses.
    #[serde(deserialize_with = "iso_8601")]
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub customer_id: u64,
    pub provider_id: u64,
    pub service_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_calendar_id: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
}

fn iso_8601<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    validate_iso_8601(&raw).map_err(serde::de::Error::custom)?;
    Ok(raw)
}

/// Accepts RFC 3339 (`Z` offsets included) and the service's naive
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` forms.
pub(crate) fn validate_iso_8601(raw: &str) -> Result<(), String> {
    if DateTime::parse_from_rfc3339(raw).is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").is_ok()
    {
        Ok(())
    } else {
        Err(format!("datetime must be ISO 8601, got {raw}"))
    }
}
