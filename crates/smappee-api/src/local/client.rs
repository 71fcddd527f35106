// Local gateway HTTP client
//
// Session-cookie client for the monitor's LAN API under
// `http://{host}/gateway/apipublic/`. Bodies are plain command strings;
// answers are JSON for reads and free text for triggers.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{self, TransportConfig};

/// The gateway answers slowly at best; anything beyond this is dead.
const LOCAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Factory password of the gateway web interface.
pub const DEFAULT_PASSWORD: &str = "admin";

/// Logon state of a [`LocalClient`].
///
/// There is no logout and no automatic re-logon: once the gateway drops
/// the session, calls fail with whatever it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    LoggedOut,
    LoggedIn,
}

/// Client for a Smappee monitor on the local network.
#[derive(Debug)]
pub struct LocalClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
    cookie_jar: Option<Arc<Jar>>,
}

impl LocalClient {
    /// Client for the gateway at `host` (IP address or hostname, optional port).
    pub fn new(host: &str) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}/gateway/apipublic/"))?;
        Self::with_base_url(base_url)
    }

    /// Client for an explicit API root, e.g. a proxy or a test server.
    pub fn with_base_url(mut base_url: Url) -> Result<Self, Error> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=UTF-8"),
        );
        let config = TransportConfig::default()
            .with_timeout(LOCAL_TIMEOUT)
            .with_cookie_jar()
            .with_headers(headers);

        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            session: Session::LoggedOut,
            cookie_jar,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session == Session::LoggedIn
    }

    /// The session `Cookie` header value, if the gateway has set one.
    pub fn session_cookie(&self) -> Option<String> {
        let jar = self.cookie_jar.as_ref()?;
        let cookies = jar.cookies(&self.base_url)?;
        cookies.to_str().ok().map(String::from)
    }

    // ── Logon ────────────────────────────────────────────────────────

    /// Log on to the gateway. Required before any other call.
    ///
    /// `POST logon` with the password as body.
    pub async fn logon(&mut self, password: &SecretString) -> Result<Value, Error> {
        debug!(base_url = %self.base_url, "logging on to local gateway");
        let body = self
            .execute(Method::POST, "logon", Some(password.expose_secret().to_owned()))
            .await?;
        let answer = transport::parse_json(&body)?;
        self.session = Session::LoggedIn;
        debug!("local logon successful");
        Ok(answer)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn require_session(&self) -> Result<(), Error> {
        match self.session {
            Session::LoggedIn => Ok(()),
            Session::LoggedOut => Err(Error::NotLoggedIn),
        }
    }

    /// `GET {path}` and return the raw body.
    pub(crate) async fn get_text(&self, path: &str) -> Result<String, Error> {
        self.require_session()?;
        self.execute(Method::GET, path, None).await
    }

    /// `GET {path}` and parse the body as JSON.
    pub(crate) async fn get_json(&self, path: &str) -> Result<Value, Error> {
        let body = self.get_text(path).await?;
        transport::parse_json(&body)
    }

    /// `POST {path}` with an optional command string; returns the raw body.
    pub(crate) async fn post_text(&self, path: &str, data: Option<String>) -> Result<String, Error> {
        self.require_session()?;
        self.execute(Method::POST, path, data).await
    }

    /// `POST {path}` and parse the body as JSON.
    pub(crate) async fn post_json(&self, path: &str, data: Option<String>) -> Result<Value, Error> {
        let body = self.post_text(path, data).await?;
        transport::parse_json(&body)
    }

    async fn execute(&self, method: Method, path: &str, data: Option<String>) -> Result<String, Error> {
        let url = self.base_url.join(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(data) = data {
            builder = builder.body(data);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;
        transport::read_body(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_from_host() {
        let client = LocalClient::new("192.168.1.20").expect("client");
        assert_eq!(
            client.base_url().as_str(),
            "http://192.168.1.20/gateway/apipublic/"
        );
        assert_eq!(client.session(), Session::LoggedOut);
        assert!(client.session_cookie().is_none());
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = Url::parse("http://127.0.0.1:8080/gateway/apipublic").expect("url");
        let client = LocalClient::with_base_url(url).expect("client");
        assert_eq!(
            client.base_url().join("logon").expect("join").as_str(),
            "http://127.0.0.1:8080/gateway/apipublic/logon"
        );
    }

    #[test]
    fn invalid_host_is_rejected() {
        assert!(matches!(
            LocalClient::new("bad host"),
            Err(Error::InvalidUrl(_))
        ));
    }
}
