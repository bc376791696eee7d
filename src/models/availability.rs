//! Availability schema: free time slots for a provider.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A half-open free slot, `HH:MM` start to `HH:MM` end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(deserialize_with = "hh_mm")]
    pub start: String,
    #[serde(deserialize_with = "hh_mm")]
    pub end: String,
}

impl TimeSlot {
    /// Builds a slot, validating both boundaries as `HH:MM` times.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, String> {
        let start = start.into();
        let end = end.into();
        validate_hh_mm(&start)?;
        validate_hh_mm(&end)?;
        Ok(Self { start, end })
    }
}

/// Free slots for one provider, service, and day.
///
/// The availabilities endpoint answers with a bare ordered array of `HH:MM`
/// boundary strings; consecutive entries pair into slots. That is the only
/// payload shape this type interprets — anything else decodes to no slots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub available: Vec<TimeSlot>,
}

impl Availability {
    /// Pairs the payload's consecutive boundary times into slots.
    ///
    /// Malformed entries (non-strings, non-`HH:MM` strings) skip the affected
    /// slot with a logged warning; they do not abort the rest.
    pub fn from_payload(payload: &Value) -> Self {
        let Some(boundaries) = payload.as_array() else {
            return Self::default();
        };

        let available = boundaries
            .windows(2)
            .filter_map(|pair| match (pair[0].as_str(), pair[1].as_str()) {
                (Some(start), Some(end)) => match TimeSlot::new(start, end) {
                    Ok(slot) => Some(slot),
                    Err(err) => {
                        tracing::warn!(error = %err, "skipping malformed availability slot");
                        None
                    }
                },
                _ => {
                    tracing::warn!("skipping non-string availability boundary");
                    None
                }
            })
            .collect();

        Self { available }
    }

    /// Whether any slot is free.
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}

fn hh_mm<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    validate_hh_mm(&raw).map_err(serde::de::Error::custom)?;
    Ok(raw)
}

/// Accepts `HH:MM` and `HH:MM:SS`.
fn validate_hh_mm(raw: &str) -> Result<(), String> {
    let ok = chrono::NaiveTime::parse_from_str(raw, "%H:%M").is_ok()
        || chrono::NaiveTime::parse_from_str(raw, "%H:%M:%S").is_ok();
    if ok {
        Ok(())
    } else {
        Err(format!("time must be in HH:MM format, got {raw}"))
    }
}
