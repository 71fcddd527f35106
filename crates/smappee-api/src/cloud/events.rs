// Appliance event endpoint

use serde_json::Value;
use tracing::debug;

use crate::cloud::client::SmappeeClient;
use crate::error::Error;
use crate::params::{ApplianceId, ServiceLocationId, TimeRange};

impl SmappeeClient {
    /// Events of one appliance inside a time window.
    ///
    /// `GET {service_location}/{id}/events?from&to&applianceId[&maxNumber]`
    ///
    /// Without `max_number` every event in the window is returned.
    pub async fn get_events(
        &mut self,
        location: &ServiceLocationId,
        appliance: &ApplianceId,
        range: TimeRange,
        max_number: Option<u32>,
    ) -> Result<Value, Error> {
        let (from, to) = range.to_epoch_millis()?;
        let url = self.location_url(&[location.as_str(), "events"])?;

        let mut query = vec![
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("applianceId", appliance.to_string()),
        ];
        if let Some(max) = max_number {
            query.push(("maxNumber", max.to_string()));
        }

        debug!(%location, %appliance, from, to, "fetching events");
        self.get(url, &query).await
    }
}
