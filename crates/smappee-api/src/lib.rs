// smappee-api: Async Rust client for the Smappee cloud API and local gateway API

pub mod auth;
pub mod cloud;
pub mod error;
pub mod local;
pub mod params;
pub mod table;
pub mod transport;

pub use auth::{Clock, Credential, SystemClock, TokenResponse};
pub use cloud::{Endpoints, SmappeeClient};
pub use error::Error;
pub use local::{InstantaneousValue, LocalClient, Session};
pub use params::{
    ActuatorDuration, ActuatorId, ActuatorState, AggregationLevel, ApplianceId,
    ServiceLocationId, SensorId, TimeRange, Timestamp,
};
pub use table::{ConsumptionTable, Localization};
pub use transport::TransportConfig;
