//! Provider endpoints.

use crate::client::Client;
use crate::error::Result;
use crate::models::Provider;
use crate::pagination::Page;
use crate::request::ApiRequest;

use super::{absent_on_not_found, decode_entity, ListParams};

/// Endpoints under `/providers`.
///
/// Obtained from [`Client::providers`].
pub struct Providers<'a> {
    client: &'a Client,
}

impl<'a> Providers<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists providers.
    pub async fn list(&self, params: ListParams) -> Result<Page<Provider>> {
        let payload = self
            .client
            .execute(params.apply(ApiRequest::get("/providers")))
            .await?;
        Ok(Page::from_payload(&payload))
    }

    /// Fetches one provider, or `None` if the id does not exist.
    pub async fn get(&self, id: u64) -> Result<Option<Provider>> {
        let result = self
            .client
            .execute(ApiRequest::get(format!("/providers/{id}")))
            .await
            .and_then(decode_entity);
        absent_on_not_found(result)
    }

    /// Creates a provider and returns the server's record of it.
    pub async fn create(&self, provider: &Provider) -> Result<Provider> {
        let payload = self
            .client
            .execute(ApiRequest::post("/providers").json(provider)?)
            .await?;
        decode_entity(payload)
    }

    /// Updates an existing provider.
    pub async fn update(&self, id: u64, provider: &Provider) -> Result<Provider> {
        let payload = self
            .client
            .execute(ApiRequest::put(format!("/providers/{id}")).json(provider)?)
            .await?;
        decode_entity(payload)
    }

    /// Deletes a provider. Deleting a missing id is an error, not a no-op.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/providers/{id}")))
            .await
            .map(|_| ())
    }
}
