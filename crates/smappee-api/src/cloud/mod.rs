// Cloud API client modules
//
// OAuth2-authenticated client for the Smappee developer API. The client
// holds the credential, refreshes it lazily right before a protected call,
// and hands back the JSON bodies unchanged.

pub mod actuators;
pub mod auth;
pub mod client;
pub mod consumption;
pub mod events;
pub mod locations;

pub use client::{Endpoints, SmappeeClient};
