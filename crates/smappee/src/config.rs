//! CLI configuration: thin wrapper around `smappee_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` and per-command overrides.

use smappee_api::{
    Credential, LocalClient, ServiceLocationId, SmappeeClient, TransportConfig,
};
use smappee_config::CloudAuth;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use smappee_config::{
    Config, Profile, SecretKind, config_path, load_config_or_default, save_config, store_secret,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, sorted, for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Loaded config plus the active profile.
///
/// A named profile that doesn't exist is an error only when `--profile`
/// asked for it explicitly; otherwise an empty profile is used so that
/// env-only setups work without a config file.
pub struct ProfileContext {
    pub config: Config,
    pub profile_name: String,
    pub profile: Profile,
}

impl ProfileContext {
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load_config_or_default();
        let profile_name = active_profile_name(global, &config);
        let profile = match config.profiles.get(&profile_name) {
            Some(profile) => profile.clone(),
            None if global.profile.is_some() => {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(&config),
                });
            }
            None => Profile::default(),
        };
        Ok(Self {
            config,
            profile_name,
            profile,
        })
    }

    /// Service location from the command line, falling back to the profile.
    pub fn location(&self, flag: Option<&str>) -> Result<ServiceLocationId, CliError> {
        flag.map(String::from)
            .or_else(|| self.profile.service_location.clone())
            .map(ServiceLocationId::new)
            .ok_or_else(|| CliError::MissingSetting {
                what: "service location".into(),
                key: "service_location".into(),
                profile: self.profile_name.clone(),
            })
    }

    /// Build an authenticated cloud client.
    ///
    /// With a password grant this performs the token request up front; with
    /// an access token the client is returned as-is.
    pub async fn cloud_client(&self) -> Result<SmappeeClient, CliError> {
        let auth = smappee_config::resolve_cloud_auth(&self.profile, &self.profile_name)?;
        let endpoints = smappee_config::profile_endpoints(&self.profile)?;
        let transport = self.cloud_transport();

        match auth {
            CloudAuth::AccessToken(token) => Ok(SmappeeClient::from_credential(
                Credential::from_access_token(token),
                endpoints,
                &transport,
            )?),
            CloudAuth::Password {
                client_id,
                client_secret,
                username,
                password,
            } => {
                let mut client = SmappeeClient::from_credential(
                    Credential::new(client_id, client_secret),
                    endpoints,
                    &transport,
                )?;
                client
                    .authenticate(&username, &password)
                    .await
                    .map_err(|e| self.auth_error(e))?;
                Ok(client)
            }
        }
    }

    /// Transport for cloud requests. Without a configured timeout the
    /// HTTP client's default applies.
    fn cloud_transport(&self) -> TransportConfig {
        match smappee_config::profile_timeout(&self.profile, &self.config.defaults) {
            Some(timeout) => TransportConfig::default().with_timeout(timeout),
            None => TransportConfig::default(),
        }
    }

    /// Build a gateway client and log on.
    pub async fn local_client(&self, host: Option<&str>) -> Result<LocalClient, CliError> {
        let host = match host {
            Some(host) => host.to_owned(),
            None => smappee_config::resolve_gateway(&self.profile, &self.profile_name)?,
        };
        let password = smappee_config::resolve_gateway_password(&self.profile, &self.profile_name);

        let mut client = LocalClient::new(&host)?;
        client
            .logon(&password)
            .await
            .map_err(|e| self.auth_error(e))?;
        tracing::debug!(%host, "logged on to gateway");
        Ok(client)
    }

    fn auth_error(&self, err: smappee_api::Error) -> CliError {
        match CliError::from(err) {
            CliError::AuthFailed { message, .. } => CliError::AuthFailed {
                profile: self.profile_name.clone(),
                message,
            },
            other => other,
        }
    }
}
