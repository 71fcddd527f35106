//! Shared configuration for the smappee CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `smappee_api` endpoints and credentials.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use smappee_api::Endpoints;

/// Keyring service name all secrets are stored under.
pub const KEYRING_SERVICE: &str = "smappee";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("no {what} configured for profile '{profile}'")]
    Missing {
        what: &'static str,
        key: &'static str,
        profile: String,
    },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Cloud request timeout in seconds. Unset means the HTTP client's own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named account profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API root override (e.g. "https://app1pub.smappee.net/dev/v1/").
    pub api_url: Option<String>,

    /// OAuth2 client id issued by Smappee.
    pub client_id: Option<String>,

    /// OAuth2 client secret (plaintext, prefer keyring or env var).
    pub client_secret: Option<String>,

    /// Smappee account username.
    pub username: Option<String>,

    /// Smappee account password (plaintext, prefer keyring).
    pub password: Option<String>,

    /// Pre-issued access token. Takes precedence over the password grant.
    pub access_token: Option<String>,

    /// Service location used when a command doesn't name one.
    pub service_location: Option<String>,

    /// Gateway host on the LAN (IP or hostname).
    pub gateway: Option<String>,

    /// Gateway web password (plaintext, prefer keyring).
    pub gateway_password: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "smappee", "smappee").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("smappee");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file yields defaults.
///
/// Environment keys use `__` as the nesting separator, e.g.
/// `SMAPPEE_PROFILES__HOME__CLIENT_ID`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SMAPPEE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Secrets ─────────────────────────────────────────────────────────

/// A secret a profile can carry, with its env var and keyring slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    ClientSecret,
    Password,
    AccessToken,
    GatewayPassword,
}

impl SecretKind {
    pub fn env_var(self) -> &'static str {
        match self {
            Self::ClientSecret => "SMAPPEE_CLIENT_SECRET",
            Self::Password => "SMAPPEE_PASSWORD",
            Self::AccessToken => "SMAPPEE_ACCESS_TOKEN",
            Self::GatewayPassword => "SMAPPEE_GATEWAY_PASSWORD",
        }
    }

    fn keyring_key(self) -> &'static str {
        match self {
            Self::ClientSecret => "client-secret",
            Self::Password => "password",
            Self::AccessToken => "access-token",
            Self::GatewayPassword => "gateway-password",
        }
    }

    fn plaintext(self, profile: &Profile) -> Option<&String> {
        match self {
            Self::ClientSecret => profile.client_secret.as_ref(),
            Self::Password => profile.password.as_ref(),
            Self::AccessToken => profile.access_token.as_ref(),
            Self::GatewayPassword => profile.gateway_password.as_ref(),
        }
    }
}

fn keyring_entry(profile_name: &str, kind: SecretKind) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{}", kind.keyring_key()))
}

/// Resolve a secret: env var, then system keyring, then plaintext in config.
pub fn resolve_secret(profile: &Profile, profile_name: &str, kind: SecretKind) -> Option<SecretString> {
    // 1. Env var
    if let Ok(val) = std::env::var(kind.env_var()) {
        return Some(SecretString::from(val));
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name, kind) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    kind.plaintext(profile).cloned().map(SecretString::from)
}

/// Store a secret in the system keyring for `profile_name`.
pub fn store_secret(profile_name: &str, kind: SecretKind, value: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, kind)?.set_password(value)?;
    Ok(())
}

// ── Cloud credentials ───────────────────────────────────────────────

/// How the CLI authenticates against the cloud API.
#[derive(Debug, Clone)]
pub enum CloudAuth {
    /// Pre-issued token, used as-is and never refreshed.
    AccessToken(SecretString),
    /// Full OAuth2 password grant.
    Password {
        client_id: String,
        client_secret: SecretString,
        username: String,
        password: SecretString,
    },
}

/// Resolve cloud credentials without CLI flags.
///
/// An access token wins when one is configured; otherwise client id,
/// client secret, username and password must all resolve.
pub fn resolve_cloud_auth(profile: &Profile, profile_name: &str) -> Result<CloudAuth, ConfigError> {
    if let Some(token) = resolve_secret(profile, profile_name, SecretKind::AccessToken) {
        return Ok(CloudAuth::AccessToken(token));
    }

    let no_credentials = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };

    let client_id = profile
        .client_id
        .clone()
        .or_else(|| std::env::var("SMAPPEE_CLIENT_ID").ok())
        .ok_or_else(no_credentials)?;
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("SMAPPEE_USERNAME").ok())
        .ok_or_else(no_credentials)?;
    let client_secret =
        resolve_secret(profile, profile_name, SecretKind::ClientSecret).ok_or_else(no_credentials)?;
    let password =
        resolve_secret(profile, profile_name, SecretKind::Password).ok_or_else(no_credentials)?;

    Ok(CloudAuth::Password {
        client_id,
        client_secret,
        username,
        password,
    })
}

/// Cloud endpoints for a profile: defaults, or derived from `api_url`.
pub fn profile_endpoints(profile: &Profile) -> Result<Endpoints, ConfigError> {
    let Some(ref raw) = profile.api_url else {
        return Ok(Endpoints::default());
    };
    let base: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    Endpoints::from_base(&base).map_err(|e| ConfigError::Validation {
        field: "api_url".into(),
        reason: e.to_string(),
    })
}

/// Request timeout for a profile, falling back to the global default.
/// `None` when neither sets one.
pub fn profile_timeout(profile: &Profile, defaults: &Defaults) -> Option<Duration> {
    profile.timeout.or(defaults.timeout).map(Duration::from_secs)
}

// ── Gateway ─────────────────────────────────────────────────────────

/// Gateway host: `SMAPPEE_GATEWAY`, then the profile.
pub fn resolve_gateway(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    std::env::var("SMAPPEE_GATEWAY")
        .ok()
        .or_else(|| profile.gateway.clone())
        .ok_or_else(|| ConfigError::Missing {
            what: "gateway host",
            key: "gateway",
            profile: profile_name.into(),
        })
}

/// Gateway password, falling back to the factory default.
pub fn resolve_gateway_password(profile: &Profile, profile_name: &str) -> SecretString {
    resolve_secret(profile, profile_name, SecretKind::GatewayPassword)
        .unwrap_or_else(|| SecretString::from(smappee_api::local::DEFAULT_PASSWORD))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
output = "json"

[profiles.home]
client_id = "my-client"
client_secret = "shh"
username = "alice"
password = "hunter2"
service_location = "12345"
gateway = "192.168.1.50"

[profiles.token]
access_token = "tok"
api_url = "http://127.0.0.1:9000/dev/v1"
timeout = 5
"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.timeout, None);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn loads_profiles_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&write_sample(&dir)).unwrap();

        assert_eq!(config.default_profile.as_deref(), Some("home"));
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.color, "auto");

        let home = &config.profiles["home"];
        assert_eq!(home.client_id.as_deref(), Some("my-client"));
        assert_eq!(home.gateway.as_deref(), Some("192.168.1.50"));
        assert_eq!(home.service_location.as_deref(), Some("12345"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "office".into(),
            Profile {
                gateway: Some("10.0.0.7".into()),
                ..Profile::default()
            },
        );
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["office"].gateway.as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn plaintext_password_grant() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&write_sample(&dir)).unwrap();

        let auth = resolve_cloud_auth(&config.profiles["home"], "smappee-config-test-home").unwrap();
        match auth {
            CloudAuth::Password {
                client_id,
                client_secret,
                username,
                password,
            } => {
                assert_eq!(client_id, "my-client");
                assert_eq!(client_secret.expose_secret(), "shh");
                assert_eq!(username, "alice");
                assert_eq!(password.expose_secret(), "hunter2");
            }
            CloudAuth::AccessToken(_) => panic!("expected password grant"),
        }
    }

    #[test]
    fn access_token_profile() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&write_sample(&dir)).unwrap();
        let profile = &config.profiles["token"];

        let auth = resolve_cloud_auth(profile, "smappee-config-test-token").unwrap();
        assert!(matches!(auth, CloudAuth::AccessToken(ref t) if t.expose_secret() == "tok"));

        let endpoints = profile_endpoints(profile).unwrap();
        assert_eq!(endpoints.token.as_str(), "http://127.0.0.1:9000/dev/v1/oauth2/token");
        assert_eq!(
            profile_timeout(profile, &config.defaults),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn timeout_unset_unless_configured() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&write_sample(&dir)).unwrap();
        assert_eq!(profile_timeout(&config.profiles["home"], &config.defaults), None);

        let defaults = Defaults {
            timeout: Some(12),
            ..Defaults::default()
        };
        assert_eq!(
            profile_timeout(&config.profiles["home"], &defaults),
            Some(Duration::from_secs(12))
        );
    }

    #[test]
    fn incomplete_profile_has_no_credentials() {
        let profile = Profile {
            client_id: Some("id".into()),
            ..Profile::default()
        };
        let result = resolve_cloud_auth(&profile, "smappee-config-test-empty");
        assert!(matches!(result, Err(ConfigError::NoCredentials { .. })));
    }

    #[test]
    fn invalid_api_url() {
        let profile = Profile {
            api_url: Some("not a url".into()),
            ..Profile::default()
        };
        assert!(matches!(
            profile_endpoints(&profile),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn gateway_password_defaults_to_factory() {
        let profile = Profile::default();
        let password = resolve_gateway_password(&profile, "smappee-config-test-gw");
        assert_eq!(password.expose_secret(), "admin");
    }
}
