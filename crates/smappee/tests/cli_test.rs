//! Integration tests for the `smappee` CLI binary.
//!
//! Argument parsing, help output, shell completions and the error paths
//! that fail before any request leaves the machine.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

const ISOLATED_HOME: &str = "/tmp/smappee-cli-test-nonexistent";

/// Build a [`Command`] for the `smappee` binary with env isolation.
///
/// Clears all `SMAPPEE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn smappee_cmd() -> assert_cmd::Command {
    smappee_cmd_with_home(Path::new(ISOLATED_HOME))
}

fn smappee_cmd_with_home(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("smappee");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("SMAPPEE_PROFILE")
        .env_remove("SMAPPEE_OUTPUT")
        .env_remove("SMAPPEE_GATEWAY")
        .env_remove("SMAPPEE_CLIENT_ID")
        .env_remove("SMAPPEE_CLIENT_SECRET")
        .env_remove("SMAPPEE_USERNAME")
        .env_remove("SMAPPEE_PASSWORD")
        .env_remove("SMAPPEE_ACCESS_TOKEN")
        .env_remove("SMAPPEE_GATEWAY_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Write `config.toml` where the binary looks for it under `home`.
fn write_config(home: &Path, contents: &str) {
    let dir = home.join("smappee");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = smappee_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    smappee_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Smappee")
            .and(predicate::str::contains("consumption"))
            .and(predicate::str::contains("events"))
            .and(predicate::str::contains("local")),
    );
}

#[test]
fn test_version_flag() {
    smappee_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("smappee"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    smappee_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    smappee_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = smappee_cmd().arg("thermostat").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized subcommand"),
        "Expected clap error in output:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    smappee_cmd()
        .args(["--output", "xml", "locations", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_locations_without_credentials() {
    let output = smappee_cmd().args(["locations", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("No credentials"),
        "Expected credentials hint in output:\n{text}"
    );
}

#[test]
fn test_consumption_without_location() {
    let output = smappee_cmd()
        .args(["consumption", "--from", "2024-01-01"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("service location"),
        "Expected missing location in output:\n{text}"
    );
}

#[test]
fn test_consumption_requires_from() {
    smappee_cmd()
        .args(["consumption", "-l", "42"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--from"));
}

#[test]
fn test_consumption_rejects_bad_timestamp() {
    let output = smappee_cmd()
        .args(["consumption", "-l", "42", "--from", "yesterday-ish"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("from"), "Expected field name in output:\n{text}");
}

#[test]
fn test_actuator_without_location() {
    smappee_cmd()
        .args(["actuator", "on", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("service location"));
}

#[test]
fn test_local_without_gateway() {
    smappee_cmd()
        .args(["local", "power"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("gateway"));
}

#[test]
fn test_local_unreachable_gateway() {
    smappee_cmd()
        .args(["local", "--host", "127.0.0.1:1", "power"])
        .assert()
        .code(7);
}

// ── Profiles ────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    smappee_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_unknown_explicit_profile() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "home"

[profiles.home]
service_location = "42"
"#,
    );

    let output = smappee_cmd_with_home(home.path())
        .args(["--profile", "office", "locations", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("office"), "Expected profile name in output:\n{text}");
}

#[test]
fn test_profile_supplies_location() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "home"

[profiles.home]
service_location = "42"
"#,
    );

    // Location resolves from the profile, so the next failure is credentials.
    smappee_cmd_with_home(home.path())
        .args(["consumption", "--from", "2024-01-01"])
        .assert()
        .code(3);
}

#[test]
fn test_config_profiles_lists_default() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "home"

[profiles.home]
gateway = "192.168.1.20"

[profiles.cabin]
gateway = "10.0.0.5"
"#,
    );

    smappee_cmd_with_home(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("home *").and(predicate::str::contains("cabin")));
}

#[test]
fn test_config_set_writes_profile() {
    let home = tempfile::tempdir().unwrap();

    smappee_cmd_with_home(home.path())
        .args(["config", "set", "gateway", "192.168.1.20"])
        .assert()
        .success();

    let written = std::fs::read_to_string(home.path().join("smappee").join("config.toml")).unwrap();
    assert!(written.contains("192.168.1.20"), "config was:\n{written}");
}

#[test]
fn test_config_show_masks_secrets() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "home"

[profiles.home]
client_id = "my-client"
client_secret = "client-secret-value"
username = "alice"
password = "hunter2-password"
access_token = "token-value-xyz"
gateway_password = "gateway-secret"
"#,
    );

    for format in ["table", "json", "yaml"] {
        let output = smappee_cmd_with_home(home.path())
            .args(["--output", format, "config", "show"])
            .output()
            .unwrap();
        assert!(output.status.success(), "config show failed for {format}");
        let text = combined_output(&output);
        for secret in [
            "client-secret-value",
            "hunter2-password",
            "token-value-xyz",
            "gateway-secret",
        ] {
            assert!(!text.contains(secret), "{secret} leaked in {format} output:\n{text}");
        }
        assert!(text.contains("my-client"), "Expected client id in {format} output:\n{text}");
        assert!(text.contains("****"), "Expected mask in {format} output:\n{text}");
    }
}

// ── Subcommand surface ──────────────────────────────────────────────

#[test]
fn test_local_subcommands_exist() {
    smappee_cmd().args(["local", "--help"]).assert().success().stdout(
        predicate::str::contains("instantaneous")
            .and(predicate::str::contains("command-control"))
            .and(predicate::str::contains("restart"))
            .and(predicate::str::contains("reset")),
    );
}

#[test]
fn test_config_subcommands_exist() {
    smappee_cmd().args(["config", "--help"]).assert().success().stdout(
        predicate::str::contains("init")
            .and(predicate::str::contains("show"))
            .and(predicate::str::contains("set"))
            .and(predicate::str::contains("profiles")),
    );
}
