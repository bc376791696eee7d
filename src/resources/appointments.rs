//! Appointment endpoints.

use crate::client::Client;
use crate::error::Result;
use crate::models::Appointment;
use crate::pagination::Page;
use crate::request::ApiRequest;

use super::{absent_on_not_found, decode_entity, ListParams};

/// Endpoints under `/appointments`.
///
/// Obtained from [`Client::appointments`].
pub struct Appointments<'a> {
    client: &'a Client,
}

impl<'a> Appointments<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists appointments.
    pub async fn list(&self, params: ListParams) -> Result<Page<Appointment>> {
        let payload = self
            .client
            .execute(params.apply(ApiRequest::get("/appointments")))
            .await?;
        Ok(Page::from_payload(&payload))
    }

    /// Fetches one appointment, or `None` if the id does not exist.
    pub async fn get(&self, id: u64) -> Result<Option<Appointment>> {
        let result = self
            .client
            .execute(ApiRequest::get(format!("/appointments/{id}")))
            .await
            .and_then(decode_entity);
        absent_on_not_found(result)
    }

    /// Books an appointment and returns the server's record of it.
    pub async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        let payload = self
            .client
            .execute(ApiRequest::post("/appointments").json(appointment)?)
            .await?;
        decode_entity(payload)
    }

    /// Updates an existing appointment.
    pub async fn update(&self, id: u64, appointment: &Appointment) -> Result<Appointment> {
        let payload = self
            .client
            .execute(ApiRequest::put(format!("/appointments/{id}")).json(appointment)?)
            .await?;
        decode_entity(payload)
    }

    /// Cancels and removes an appointment. Deleting a missing id is an error,
    /// not a no-op.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/appointments/{id}")))
            .await
            .map(|_| ())
    }
}
