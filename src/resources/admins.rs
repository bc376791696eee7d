//! Admin endpoints.

use crate::client::Client;
use crate::error::Result;
use crate::models::Admin;
use crate::pagination::Page;
use crate::request::ApiRequest;

use super::{absent_on_not_found, decode_entity, ListParams};

/// Endpoints under `/admins`.
///
/// Obtained from [`Client::admins`].
pub struct Admins<'a> {
    client: &'a Client,
}

impl<'a> Admins<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists admin users.
    pub async fn list(&self, params: ListParams) -> Result<Page<Admin>> {
        let payload = self
            .client
            .execute(params.apply(ApiRequest::get("/admins")))
            .await?;
        Ok(Page::from_payload(&payload))
    }

    /// Fetches one admin, or `None` if the id does not exist.
    pub async fn get(&self, id: u64) -> Result<Option<Admin>> {
        let result = self
            .client
            .execute(ApiRequest::get(format!("/admins/{id}")))
            .await
            .and_then(decode_entity);
        absent_on_not_found(result)
    }

    /// Creates an admin and returns the server's record of it.
    pub async fn create(&self, admin: &Admin) -> Result<Admin> {
        let payload = self
            .client
            .execute(ApiRequest::post("/admins").json(admin)?)
            .await?;
        decode_entity(payload)
    }

    /// Updates an existing admin.
    pub async fn update(&self, id: u64, admin: &Admin) -> Result<Admin> {
        let payload = self
            .client
            .execute(ApiRequest::put(format!("/admins/{id}")).json(admin)?)
            .await?;
        decode_entity(payload)
    }

    /// Deletes an admin. Deleting a missing id is an error, not a no-op.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/admins/{id}")))
            .await
            .map(|_| ())
    }
}
