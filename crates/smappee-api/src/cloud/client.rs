// Cloud API HTTP client
//
// Owns the credential and the request dispatcher. Endpoint groups
// (locations, consumption, events, actuators) are implemented as inherent
// methods in separate files to keep this module focused on transport and
// token mechanics.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{Clock, Credential, SystemClock};
use crate::error::Error;
use crate::transport::{self, TransportConfig};

/// Token endpoint of the public developer API.
pub const DEFAULT_TOKEN_URL: &str = "https://app1pub.smappee.net/dev/v1/oauth2/token";

/// Root of the service location resources.
pub const DEFAULT_SERVICE_LOCATION_URL: &str =
    "https://app1pub.smappee.net/dev/v1/servicelocation";

// ── Endpoints ───────────────────────────────────────────────────────

/// The two roots every cloud request is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token: Url,
    pub service_location: Url,
}

impl Endpoints {
    /// Derive both endpoints from an API root such as
    /// `https://app1pub.smappee.net/dev/v1/`.
    pub fn from_base(base: &Url) -> Result<Self, Error> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            token: base.join("oauth2/token")?,
            service_location: base.join("servicelocation")?,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token: Url::parse(DEFAULT_TOKEN_URL).expect("valid default token URL"),
            service_location: Url::parse(DEFAULT_SERVICE_LOCATION_URL)
                .expect("valid default service location URL"),
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Client for the Smappee cloud API.
///
/// The credential is an owned, mutable field: a protected call made with
/// an expired token first runs exactly one refresh grant (when a refresh
/// token is available), then issues the request. Methods take `&mut self`,
/// so a client shared between tasks must be wrapped in a lock by the caller.
pub struct SmappeeClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    credential: Credential,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SmappeeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmappeeClient")
            .field("endpoints", &self.endpoints)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl SmappeeClient {
    /// Client for the full OAuth2 flow. Call
    /// [`authenticate`](Self::authenticate) before any API method.
    pub fn new(client_id: impl Into<String>, client_secret: SecretString) -> Result<Self, Error> {
        Self::from_credential(
            Credential::new(client_id, client_secret),
            Endpoints::default(),
            &TransportConfig::default(),
        )
    }

    /// Client that only uses an externally obtained access token.
    ///
    /// It has no means of refreshing the token; once it expires every call
    /// fails with whatever the API answers (`Error::RemoteApi`).
    pub fn with_access_token(access_token: SecretString) -> Result<Self, Error> {
        Self::from_credential(
            Credential::from_access_token(access_token),
            Endpoints::default(),
            &TransportConfig::default(),
        )
    }

    /// Create a client from a credential, endpoints and a transport config.
    pub fn from_credential(
        credential: Credential,
        endpoints: Endpoints,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, credential, endpoints))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, credential: Credential, endpoints: Endpoints) -> Self {
        Self {
            http,
            endpoints,
            credential,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the endpoints (e.g. to target a staging environment).
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Replace the time source used for expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current token state.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub(crate) fn credential_mut(&mut self) -> &mut Credential {
        &mut self.credential
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Whether the credential is valid right now, per the client's clock.
    pub fn is_token_valid(&self) -> bool {
        self.credential.is_valid_at(self.now())
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{service_location}/{segments...}`, percent-encoding each segment.
    pub(crate) fn location_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.endpoints.service_location.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Refresh the token if it is no longer valid and a refresh token is held.
    ///
    /// Without a refresh token (access-token-only mode, or before the first
    /// `authenticate`) the current token is used as-is and the remote API
    /// decides.
    pub(crate) async fn ensure_fresh_token(&mut self) -> Result<(), Error> {
        if self.is_token_valid() {
            return Ok(());
        }
        if self.credential.can_refresh() {
            debug!("access token expired, refreshing");
            self.refresh().await?;
        } else {
            trace!("access token not valid and not refreshable, sending as-is");
        }
        Ok(())
    }

    /// Issue a bearer-authenticated request and return the parsed JSON body.
    pub(crate) async fn dispatch<B: Serialize + ?Sized>(
        &mut self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Value, Error> {
        self.ensure_fresh_token().await?;

        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = self.credential.access_token() {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let body = transport::read_body(resp).await?;
        transport::parse_json(&body)
    }

    /// `GET` helper over [`dispatch`](Self::dispatch).
    pub(crate) async fn get(&mut self, url: Url, query: &[(&str, String)]) -> Result<Value, Error> {
        self.dispatch::<()>(Method::GET, url, query, None).await
    }

    /// `POST` helper with a JSON body.
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &mut self,
        url: Url,
        body: &B,
    ) -> Result<Value, Error> {
        self.dispatch(Method::POST, url, &[], Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SmappeeClient {
        SmappeeClient::with_client(
            reqwest::Client::new(),
            Credential::new("c", SecretString::from("s")),
            Endpoints::default(),
        )
    }

    #[test]
    fn default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.token.as_str(), DEFAULT_TOKEN_URL);
        assert_eq!(endpoints.service_location.as_str(), DEFAULT_SERVICE_LOCATION_URL);
    }

    #[test]
    fn endpoints_from_base_with_or_without_slash() {
        for base in ["http://127.0.0.1:9000/dev/v1", "http://127.0.0.1:9000/dev/v1/"] {
            let endpoints = Endpoints::from_base(&Url::parse(base).expect("url")).expect("endpoints");
            assert_eq!(endpoints.token.as_str(), "http://127.0.0.1:9000/dev/v1/oauth2/token");
            assert_eq!(
                endpoints.service_location.as_str(),
                "http://127.0.0.1:9000/dev/v1/servicelocation"
            );
        }
    }

    #[test]
    fn location_url_joins_segments() {
        let client = client();
        let url = client.location_url(&["123", "sensor", "4", "consumption"]).expect("url");
        assert_eq!(
            url.as_str(),
            "https://app1pub.smappee.net/dev/v1/servicelocation/123/sensor/4/consumption"
        );
        let root = client.location_url(&[]).expect("url");
        assert_eq!(root.as_str(), DEFAULT_SERVICE_LOCATION_URL);
    }

    #[test]
    fn location_url_encodes_segments() {
        let url = client().location_url(&["a b", "info"]).expect("url");
        assert!(url.as_str().ends_with("/servicelocation/a%20b/info"));
    }

    #[test]
    fn debug_hides_secrets() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("\"s\""));
    }
}
