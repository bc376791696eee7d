//! Entity schemas for the scheduling service.
//!
//! These are data-shape contracts: serde structs mirroring the service's wire
//! format (camelCase field names where the service uses them). The request
//! execution core is agnostic to all of them; it only ever sees
//! `serde_json::Value`.

mod admin;
mod appointment;
mod availability;
mod customer;
mod provider;

pub use admin::{Admin, AdminSettings};
pub use appointment::{Appointment, AppointmentStatus};
pub use availability::{Availability, TimeSlot};
pub use customer::{Customer, CustomerSettings};
pub use provider::{Break, Provider, ProviderSettings, WorkingDay, WorkingPlan};
