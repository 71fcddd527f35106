use thiserror::Error;

/// Top-level error type for the `smappee-api` crate.
///
/// Every failure mode gets its own variant so callers can branch on
/// authentication vs. transport vs. parse failures. Nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The token endpoint rejected the credentials or refresh token,
    /// or answered with a payload that is not a token grant.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A local gateway operation was attempted before `logon`.
    #[error("Not logged in to the local gateway -- call logon first")]
    NotLoggedIn,

    // ── Remote API ──────────────────────────────────────────────────
    /// Any non-2xx answer from a cloud or gateway endpoint.
    #[error("Remote API error (HTTP {status}): {body}")]
    RemoteApi { status: u16, body: String },

    /// The response body is not the JSON shape we expected.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── Parameters ──────────────────────────────────────────────────
    /// A calendar timestamp could not be mapped onto a single instant.
    #[error("Invalid timestamp: {message}")]
    InvalidTimestamp { message: String },
}

impl Error {
    /// Returns `true` for failures of the token endpoint or the gateway logon gate.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::NotLoggedIn)
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the remote answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub(crate) fn malformed(message: impl Into<String>, body: &str) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            body: body.to_owned(),
        }
    }
}
