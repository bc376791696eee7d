//! Customer endpoints.

use crate::client::Client;
use crate::error::Result;
use crate::models::Customer;
use crate::pagination::Page;
use crate::request::ApiRequest;

use super::{absent_on_not_found, decode_entity, ListParams};

/// Endpoints under `/customers`.
///
/// Obtained from [`Client::customers`].
pub struct Customers<'a> {
    client: &'a Client,
}

impl<'a> Customers<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists customers.
    pub async fn list(&self, params: ListParams) -> Result<Page<Customer>> {
        let payload = self
            .client
            .execute(params.apply(ApiRequest::get("/customers")))
            .await?;
        Ok(Page::from_payload(&payload))
    }

    /// Fetches one customer, or `None` if the id does not exist.
    pub async fn get(&self, id: u64) -> Result<Option<Customer>> {
        let result = self
            .client
            .execute(ApiRequest::get(format!("/customers/{id}")))
            .await
            .and_then(decode_entity);
        absent_on_not_found(result)
    }

    /// Creates a customer and returns the server's record of it.
    pub async fn create(&self, customer: &Customer) -> Result<Customer> {
        let payload = self
            .client
            .execute(ApiRequest::post("/customers").json(customer)?)
            .await?;
        decode_entity(payload)
    }

    /// Updates an existing customer.
    pub async fn update(&self, id: u64, customer: &Customer) -> Result<Customer> {
        let payload = self
            .client
            .execute(ApiRequest::put(format!("/customers/{id}")).json(customer)?)
            .await?;
        decode_entity(payload)
    }

    /// Deletes a customer. Deleting a missing id is an error, not a no-op.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.client
            .execute(ApiRequest::delete(format!("/customers/{id}")))
            .await
            .map(|_| ())
    }
}
