//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, SecretArg};
use crate::config::{self, Config, Profile, SecretKind};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

const MASK: &str = "****";

/// Copy of the config with every stored secret masked.
fn redacted(cfg: &Config) -> Config {
    let mut out = cfg.clone();
    for profile in out.profiles.values_mut() {
        for secret in [
            &mut profile.client_secret,
            &mut profile.password,
            &mut profile.access_token,
            &mut profile.gateway_password,
        ] {
            if secret.is_some() {
                *secret = Some(MASK.to_owned());
            }
        }
    }
    out
}

/// Format a (redacted) config as TOML-like text.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    if let Some(timeout) = cfg.defaults.timeout {
        let _ = writeln!(out, "timeout = {timeout}");
    }

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let fields = [
            ("api_url", &p.api_url),
            ("client_id", &p.client_id),
            ("client_secret", &p.client_secret),
            ("username", &p.username),
            ("password", &p.password),
            ("access_token", &p.access_token),
            ("service_location", &p.service_location),
            ("gateway", &p.gateway),
            ("gateway_password", &p.gateway_password),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = \"{value}\"");
            }
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn secret_kind(arg: SecretArg) -> SecretKind {
    match arg {
        SecretArg::Password => SecretKind::Password,
        SecretArg::ClientSecret => SecretKind::ClientSecret,
        SecretArg::AccessToken => SecretKind::AccessToken,
        SecretArg::GatewayPassword => SecretKind::GatewayPassword,
    }
}

/// Ask where to keep a secret; returns it when it belongs in the config file.
fn store_or_keep(
    profile_name: &str,
    kind: SecretKind,
    label: &str,
    value: String,
) -> Result<Option<String>, CliError> {
    let store_choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if store_selection == 0 {
        config::store_secret(profile_name, kind, &value)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            let candidate = Profile {
                api_url: Some(value.clone()),
                ..Profile::default()
            };
            smappee_config::profile_endpoints(&candidate)?;
            profile.api_url = Some(value);
        }
        "client_id" | "client-id" => profile.client_id = Some(value),
        "client_secret" | "client-secret" => profile.client_secret = Some(value),
        "username" => profile.username = Some(value),
        "access_token" | "access-token" => profile.access_token = Some(value),
        "service_location" | "service-location" | "location" => {
            profile.service_location = Some(value);
        }
        "gateway" => profile.gateway = Some(value),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_url, client_id, client_secret, \
                     username, access_token, service_location, gateway, timeout"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::success(global, &format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: smappee config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(global, &format!("Default profile set to '{name}'"));
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile, secret } => {
            let cfg = config::load_config_or_default();
            let profile_name =
                profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let kind = secret_kind(secret);
            let value = rpassword::prompt_password("Secret: ").map_err(prompt_err)?;
            if value.is_empty() {
                return Err(CliError::Validation {
                    field: "secret".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            config::store_secret(&profile_name, kind, &value)?;
            output::success(
                global,
                &format!("Secret stored in system keyring for profile '{profile_name}'"),
            );
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("Smappee CLI configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let mut profile = Profile::default();

    // 2. Auth mode
    let auth_choices = &["Client credentials + account password", "Access token"];
    let auth_selection = Select::new()
        .with_prompt("Authentication method")
        .items(auth_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if auth_selection == 0 {
        let client_id: String = Input::new()
            .with_prompt("Client ID")
            .interact_text()
            .map_err(prompt_err)?;
        let client_secret = rpassword::prompt_password("Client secret: ").map_err(prompt_err)?;
        let username: String = Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?;
        let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;

        if client_id.is_empty() || client_secret.is_empty() || username.is_empty() || password.is_empty() {
            return Err(CliError::Validation {
                field: "credentials".into(),
                reason: "client id, client secret, username and password are all required".into(),
            });
        }

        profile.client_id = Some(client_id);
        profile.username = Some(username);
        profile.client_secret =
            store_or_keep(&profile_name, SecretKind::ClientSecret, "client secret", client_secret)?;
        profile.password = store_or_keep(&profile_name, SecretKind::Password, "password", password)?;
    } else {
        let token = rpassword::prompt_password("Access token: ").map_err(prompt_err)?;
        if token.is_empty() {
            return Err(CliError::Validation {
                field: "access_token".into(),
                reason: "access token cannot be empty".into(),
            });
        }
        profile.access_token =
            store_or_keep(&profile_name, SecretKind::AccessToken, "access token", token)?;
    }

    // 3. Optional defaults
    let location: String = Input::new()
        .with_prompt("Default service location ID (blank to skip)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    if !location.is_empty() {
        profile.service_location = Some(location);
    }

    let gateway: String = Input::new()
        .with_prompt("Gateway host on your LAN (blank to skip)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    if !gateway.is_empty() {
        profile.gateway = Some(gateway);
        let gw_password =
            rpassword::prompt_password("Gateway password (blank for factory default): ")
                .map_err(prompt_err)?;
        if !gw_password.is_empty() {
            profile.gateway_password = store_or_keep(
                &profile_name,
                SecretKind::GatewayPassword,
                "gateway password",
                gw_password,
            )?;
        }
    }

    // 4. Merge into existing config and write
    let mut cfg: Config = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: smappee locations list");

    Ok(())
}
