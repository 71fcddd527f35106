#![allow(clippy::unwrap_used)]
// Integration tests for `LocalClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use smappee_api::local::DEFAULT_PASSWORD;
use smappee_api::{Error, LocalClient, Session};

// ── Helpers ─────────────────────────────────────────────────────────

const BASE: &str = "/gateway/apipublic";

fn api_path(suffix: &str) -> String {
    format!("{BASE}/{suffix}")
}

async fn setup() -> (MockServer, LocalClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}{BASE}/", server.uri())).unwrap();
    let client = LocalClient::with_base_url(base_url).unwrap();
    (server, client)
}

async fn logged_in() -> (MockServer, LocalClient) {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("logon")))
        .and(body_string(DEFAULT_PASSWORD))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=abc123; Path=/")
                .set_body_json(json!({ "success": "Logon successful!" })),
        )
        .mount(&server)
        .await;

    client
        .logon(&SecretString::from(DEFAULT_PASSWORD))
        .await
        .unwrap();
    (server, client)
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_calls_before_logon_fail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    assert!(matches!(client.load_config().await, Err(Error::NotLoggedIn)));
    assert!(matches!(client.load_instantaneous().await, Err(Error::NotLoggedIn)));
    assert!(matches!(client.restart().await, Err(Error::NotLoggedIn)));
    assert!(matches!(
        client.on_off_command_control("1").await,
        Err(Error::NotLoggedIn)
    ));
    assert!(matches!(client.load_logfiles().await, Err(Error::NotLoggedIn)));
    assert_eq!(client.session(), Session::LoggedOut);
}

#[tokio::test]
async fn test_logon_sets_session_and_cookie() {
    let (_server, client) = logged_in().await;

    assert!(client.is_logged_in());
    let cookie = client.session_cookie().unwrap();
    assert!(cookie.contains("JSESSIONID=abc123"), "cookie was {cookie}");
}

#[tokio::test]
async fn test_logon_rejected_stays_logged_out() {
    let (server, mut client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("logon")))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let result = client.logon(&SecretString::from("wrong")).await;
    assert_eq!(result.as_ref().err().and_then(Error::status), Some(403));
    assert_eq!(client.session(), Session::LoggedOut);
}

#[tokio::test]
async fn test_session_cookie_is_sent_back() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(api_path("configPublic")))
        .and(header("cookie", "JSESSIONID=abc123"))
        .and(header("content-type", "application/json;charset=UTF-8"))
        .and(body_string("load"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hostname": "smappee" })))
        .expect(1)
        .mount(&server)
        .await;

    let config = client.load_config().await.unwrap();
    assert_eq!(config["hostname"], "smappee");
}

// ── Instantaneous tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_active_power_and_cosfi() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(api_path("instantaneous")))
        .and(body_string("loadInstantaneous"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "key": "phase0ActivePower", "value": "1500" },
            { "key": "phase1ActivePower", "value": "500" },
            { "key": "phase0Cosfi", "value": "95" },
            { "key": "phase1Cosfi", "value": "85" }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let power = client.active_power().await.unwrap();
    assert!((power - 2.0).abs() < f64::EPSILON, "power was {power}");

    let cosfi = client.active_cosfi().await.unwrap().unwrap();
    assert!((cosfi - 90.0).abs() < f64::EPSILON, "cosfi was {cosfi}");
}

#[tokio::test]
async fn test_report_instantaneous_values() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(api_path("reportInstantaneousValues")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "report": "Phase 1: 230V" })))
        .mount(&server)
        .await;

    let report = client.report_instantaneous_values().await.unwrap();
    assert_eq!(report["report"], "Phase 1: 230V");
}

// ── Command control tests ───────────────────────────────────────────

#[tokio::test]
async fn test_command_control_bodies() {
    let (server, client) = logged_in().await;

    for body in [
        "controlGroup",
        "control,controlId=7",
        "delete,controlId=7",
        "deleteTimers,controlId=7",
    ] {
        Mock::given(method("POST"))
            .and(path(api_path("commandControlPublic")))
            .and(body_string(body))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;
    }

    assert_eq!(client.send_group().await.unwrap(), "ok");
    assert_eq!(client.on_off_command_control("7").await.unwrap(), "ok");
    assert_eq!(client.delete_command_control("7").await.unwrap(), "ok");
    assert_eq!(client.delete_command_control_timers("7").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_save_config_sends_payload_verbatim() {
    let (server, client) = logged_in().await;

    let payload = "save,dhcp=true,hostname=smappee-kitchen";
    Mock::given(method("POST"))
        .and(path(api_path("configPublic")))
        .and(body_string(payload))
        .respond_with(ResponseTemplate::new(200).set_body_string("saved"))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.save_config(payload).await.unwrap(), "saved");
}

// ── Maintenance and logs ────────────────────────────────────────────

#[tokio::test]
async fn test_restart_uses_action_query() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(api_path("restartSmappee")))
        .and(query_param("action", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("restarting"))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.restart().await.unwrap(), "restarting");
}

#[tokio::test]
async fn test_reset_triggers_hit_their_paths() {
    let (server, client) = logged_in().await;

    for suffix in [
        "resetActivePowerPeaks",
        "resetIPScanCache",
        "resetSensorCache",
        "clearData",
        "clearAppliances",
    ] {
        Mock::given(method("POST"))
            .and(path(api_path(suffix)))
            .respond_with(ResponseTemplate::new(200).set_body_string(suffix))
            .expect(1)
            .mount(&server)
            .await;
    }

    assert_eq!(client.reset_active_power_peaks().await.unwrap(), "resetActivePowerPeaks");
    assert_eq!(client.reset_ip_scan_cache().await.unwrap(), "resetIPScanCache");
    assert_eq!(client.reset_sensor_cache().await.unwrap(), "resetSensorCache");
    assert_eq!(client.reset_data().await.unwrap(), "clearData");
    assert_eq!(client.clear_appliances().await.unwrap(), "clearAppliances");
}

#[tokio::test]
async fn test_logfiles() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(api_path("logBrowser")))
        .and(body_string("logFileList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "logFiles": ["main.log"] })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("logBrowser")))
        .and(body_string("logFileSelect,main.log"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "boot ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let list = client.load_logfiles().await.unwrap();
    assert_eq!(list["logFiles"][0], "main.log");

    let file = client.select_logfile("main.log").await.unwrap();
    assert_eq!(file["content"], "boot ok");
}

#[tokio::test]
async fn test_advanced_config_and_command_control_config() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(api_path("advancedConfigPublic")))
        .and(body_string("load"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ntp": "pool.ntp.org" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("commandControlPublic")))
        .and(body_string("load"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "plugs": [] })))
        .mount(&server)
        .await;

    assert_eq!(client.load_advanced_config().await.unwrap()["ntp"], "pool.ntp.org");
    assert_eq!(client.load_command_control_config().await.unwrap()["plugs"], json!([]));
}
