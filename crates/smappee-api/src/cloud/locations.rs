// Service location endpoints

use serde_json::Value;
use tracing::debug;

use crate::cloud::client::SmappeeClient;
use crate::error::Error;
use crate::params::ServiceLocationId;

impl SmappeeClient {
    /// List the service locations the account has access to.
    ///
    /// `GET {service_location}`
    pub async fn get_service_locations(&mut self) -> Result<Value, Error> {
        let url = self.location_url(&[])?;
        debug!("listing service locations");
        self.get(url, &[]).await
    }

    /// Metadata for one service location: appliances, actuators, sensors,
    /// timezone and so on.
    ///
    /// `GET {service_location}/{id}/info`
    pub async fn get_service_location_info(
        &mut self,
        location: &ServiceLocationId,
    ) -> Result<Value, Error> {
        let url = self.location_url(&[location.as_str(), "info"])?;
        debug!(%location, "fetching service location info");
        self.get(url, &[]).await
    }
}
