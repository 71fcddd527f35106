//! CLI error types with miette diagnostics.
//!
//! Maps `smappee_api::Error` and `ConfigError` variants into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use smappee_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach {target}")]
    #[diagnostic(
        code(smappee::connection_failed),
        help(
            "Check your network connection.\n\
             For the local gateway, make sure the monitor is on the same LAN\n\
             and the host is right: smappee config set gateway <host>"
        )
    )]
    ConnectionFailed {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(smappee::auth_failed),
        help(
            "Verify your client id, client secret, username and password.\n\
             Run: smappee config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(smappee::no_credentials),
        help(
            "Configure credentials with: smappee config init\n\
             Or set SMAPPEE_ACCESS_TOKEN, or SMAPPEE_CLIENT_ID, SMAPPEE_CLIENT_SECRET,\n\
             SMAPPEE_USERNAME and SMAPPEE_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("Not logged in to the local gateway")]
    #[diagnostic(code(smappee::not_logged_in))]
    NotLoggedIn,

    // ── Resources ────────────────────────────────────────────────────

    #[error("Not found: {body}")]
    #[diagnostic(
        code(smappee::not_found),
        help("Run: smappee locations list to see available service locations")
    )]
    NotFound { body: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error (HTTP {status}): {body}")]
    #[diagnostic(code(smappee::api_error))]
    ApiError { status: u16, body: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(code(smappee::malformed_response))]
    MalformedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(smappee::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(smappee::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: smappee config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(smappee::missing_setting),
        help("Pass it on the command line, or run: smappee config set {key} <value>")
    )]
    MissingSetting {
        what: String,
        key: String,
        profile: String,
    },

    #[error("{0}")]
    #[diagnostic(code(smappee::config))]
    Config(String),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(smappee::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::NotLoggedIn => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::MissingSetting { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── smappee_api::Error → CliError mapping ────────────────────────────

impl From<smappee_api::Error> for CliError {
    fn from(err: smappee_api::Error) -> Self {
        use smappee_api::Error;

        match err {
            Error::Authentication { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            Error::NotLoggedIn => CliError::NotLoggedIn,

            Error::RemoteApi { status: 401 | 403, body } => CliError::AuthFailed {
                profile: "current".into(),
                message: body,
            },

            Error::RemoteApi { status: 404, body } => CliError::NotFound { body },

            Error::RemoteApi { status, body } => CliError::ApiError { status, body },

            Error::MalformedResponse { message, .. } => CliError::MalformedResponse { message },

            Error::Transport(e) => {
                let target = e
                    .url()
                    .and_then(|u| u.host_str().map(String::from))
                    .unwrap_or_else(|| "remote host".into());
                CliError::ConnectionFailed {
                    target,
                    source: Box::new(e),
                }
            }

            Error::InvalidUrl(e) => CliError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            Error::InvalidTimestamp { message } => CliError::Validation {
                field: "timestamp".into(),
                reason: message,
            },

            Error::HttpClient(message) => CliError::Config(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Missing { what, key, profile } => CliError::MissingSetting {
                what: what.into(),
                key: key.into(),
                profile,
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_status_maps_to_exit_code() {
        let not_found: CliError = smappee_api::Error::RemoteApi {
            status: 404,
            body: "no such location".into(),
        }
        .into();
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let unauthorized: CliError = smappee_api::Error::RemoteApi {
            status: 401,
            body: "expired".into(),
        }
        .into();
        assert_eq!(unauthorized.exit_code(), exit_code::AUTH);

        let server: CliError = smappee_api::Error::RemoteApi {
            status: 500,
            body: "oops".into(),
        }
        .into();
        assert_eq!(server.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn missing_gateway_names_config_key() {
        let err: CliError = ConfigError::Missing {
            what: "gateway host",
            key: "gateway",
            profile: "default".into(),
        }
        .into();
        match err {
            CliError::MissingSetting { key, .. } => assert_eq!(key, "gateway"),
            other => panic!("expected MissingSetting, got {other:?}"),
        }
    }
}
