//! Customer schema.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_calendar_view() -> String {
    "default".to_string()
}

fn default_date_format() -> String {
    "DMY".to_string()
}

/// Per-customer preferences. Unlike the other entities these travel in
/// snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default = "default_calendar_view")]
    pub calendar_view: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for CustomerSettings {
    fn default() -> Self {
        Self {
            username: None,
            notifications: true,
            timezone: None,
            calendar_view: default_calendar_view(),
            date_format: default_date_format(),
        }
    }
}

/// A customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Absent when building a creation request; assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, rename = "zipCode", skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CustomerSettings>,
}
