// Shared transport configuration for building reqwest::Client instances.
//
// The cloud client and the local gateway client share user agent,
// timeout, and cookie settings through this module.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::HeaderMap;
use tracing::trace;

use crate::error::Error;

const USER_AGENT: &str = concat!("smappee-rs/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Request timeout. `None` keeps the reqwest default (no timeout).
    pub timeout: Option<Duration>,
    /// Cookie jar for session-based APIs (the local gateway).
    pub cookie_jar: Option<Arc<Jar>>,
    /// Headers sent with every request.
    pub default_headers: HeaderMap,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(self.default_headers.clone());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(ref jar) = self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))
    }

    /// Set a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Create a config with a fresh cookie jar (for session auth).
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }

    /// Add default headers sent on every request.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers.extend(headers);
        self
    }
}

// ── Response helpers ────────────────────────────────────────────────

/// Read the body of a response, turning any non-2xx status into
/// `Error::RemoteApi` with the body attached.
pub(crate) async fn read_body(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::RemoteApi {
            status: status.as_u16(),
            body,
        });
    }
    let body = resp.text().await.map_err(Error::Transport)?;
    trace!(status = status.as_u16(), bytes = body.len(), "response received");
    Ok(body)
}

/// Parse a body as JSON. An empty body (some command endpoints reply
/// with no content) parses as `null`.
pub(crate) fn parse_json(body: &str) -> Result<serde_json::Value, Error> {
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::malformed(format!("{e} (body preview: {preview:?})"), body)
    })
}
