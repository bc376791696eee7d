//! Availability lookups.

use crate::client::Client;
use crate::error::Result;
use crate::models::Availability;
use crate::request::ApiRequest;

/// Endpoints under `/availabilities`.
///
/// Obtained from [`Client::availabilities`].
pub struct Availabilities<'a> {
    client: &'a Client,
}

impl<'a> Availabilities<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Free slots for a provider and service on `date` (`YYYY-MM-DD`), or on
    /// the server's current day when `date` is `None`.
    pub async fn slots(
        &self,
        provider_id: u64,
        service_id: u64,
        date: Option<&str>,
    ) -> Result<Availability> {
        let mut request = ApiRequest::get("/availabilities")
            .query("providerId", provider_id)
            .query("serviceId", service_id);
        if let Some(date) = date {
            request = request.query("date", date);
        }

        let payload = self.client.execute(request).await?;
        Ok(Availability::from_payload(&payload))
    }
}
