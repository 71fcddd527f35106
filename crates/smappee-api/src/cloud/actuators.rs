// Actuator (smart plug) switching

use serde_json::Value;
use tracing::debug;

use crate::cloud::client::SmappeeClient;
use crate::error::Error;
use crate::params::{ActuatorDuration, ActuatorId, ActuatorPayload, ActuatorState, ServiceLocationId};

impl SmappeeClient {
    /// Turn an actuator on.
    ///
    /// `POST {service_location}/{id}/actuator/{actuator}/on`
    ///
    /// `duration` of 300, 900, 1800 or 3600 seconds switches it on for that
    /// long; any other value (or `None`) for an undetermined period.
    pub async fn actuator_on(
        &mut self,
        location: &ServiceLocationId,
        actuator: &ActuatorId,
        duration: Option<ActuatorDuration>,
    ) -> Result<Value, Error> {
        self.set_actuator(location, actuator, ActuatorState::On, duration)
            .await
    }

    /// Turn an actuator off.
    ///
    /// `POST {service_location}/{id}/actuator/{actuator}/off`
    pub async fn actuator_off(
        &mut self,
        location: &ServiceLocationId,
        actuator: &ActuatorId,
        duration: Option<ActuatorDuration>,
    ) -> Result<Value, Error> {
        self.set_actuator(location, actuator, ActuatorState::Off, duration)
            .await
    }

    /// Switch an actuator to `state`. The API usually answers with an empty
    /// body, which comes back as `Value::Null`.
    pub async fn set_actuator(
        &mut self,
        location: &ServiceLocationId,
        actuator: &ActuatorId,
        state: ActuatorState,
        duration: Option<ActuatorDuration>,
    ) -> Result<Value, Error> {
        let url = self.location_url(&[
            location.as_str(),
            "actuator",
            actuator.as_str(),
            state.as_ref(),
        ])?;
        debug!(%location, %actuator, %state, duration = ?duration.map(ActuatorDuration::as_secs), "switching actuator");
        self.post(url, &ActuatorPayload { duration }).await
    }
}
