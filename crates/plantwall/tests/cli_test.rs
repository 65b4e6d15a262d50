//! Integration tests for the `plantwall` CLI binary.
//!
//! Argument parsing and config handling run without a backend; the
//! command round-trips run against a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use plantwall_core::controls::{BRIGHTNESS, WATERING_DURATION, WATERING_INTERVAL_HOURS};
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `plantwall` binary with env isolation.
///
/// Clears all `PLANTWALL_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn plantwall_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("plantwall");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env("PLANTWALL_DEFAULTS__SETTLE_DELAY_MS", "50")
        .env_remove("PLANTWALL_PROFILE")
        .env_remove("PLANTWALL_BACKEND")
        .env_remove("PLANTWALL_ENV")
        .env_remove("PLANTWALL_OUTPUT")
        .env_remove("PLANTWALL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn lighting_body(is_on: bool, brightness: u8) -> Value {
    json!({
        "is_on": is_on,
        "brightness": brightness,
        "power_usage": 42.5,
        "schedule_enabled": false,
        "last_changed": "2024-06-15T06:00:00Z"
    })
}

fn watering_body(emergency_stop: bool) -> Value {
    json!({
        "is_running": false,
        "water_level": 64.0,
        "last_watering": "2024-06-15T06:00:00Z",
        "emergency_stop": emergency_stop,
        "auto_mode": false
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = plantwall_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("plant wall")
            .and(predicate::str::contains("lighting"))
            .and(predicate::str::contains("watering"))
            .and(predicate::str::contains("sensors")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("plantwall"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plantwall"));
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .arg("irrigate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_brightness_out_of_range() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .args(["lighting", "brightness", "120"])
        .assert()
        .code(2);
}

#[test]
fn test_watering_duration_below_minimum() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .args(["watering", "start", "--duration", "5"])
        .assert()
        .code(2);
}

/// The clap bounds must agree with the ranges the TUI sliders step through.
#[test]
fn test_argument_bounds_match_control_ranges() {
    let cases = [
        (vec!["lighting", "brightness"], BRIGHTNESS),
        (vec!["watering", "start", "--duration"], WATERING_DURATION),
        (vec!["watering", "schedule", "--interval"], WATERING_INTERVAL_HOURS),
    ];
    for (args, range) in cases {
        let home = tempfile::tempdir().unwrap();
        for rejected in [range.min.checked_sub(1), Some(range.max + 1)]
            .into_iter()
            .flatten()
        {
            plantwall_cmd(home.path())
                .args(&args)
                .arg(rejected.to_string())
                .assert()
                .code(2);
        }
        // In-range values get past parsing and fail on the unreachable backend.
        for accepted in [range.min, range.max] {
            plantwall_cmd(home.path())
                .args(["--backend", "http://127.0.0.1:9", "--timeout", "2"])
                .args(&args)
                .arg(accepted.to_string())
                .assert()
                .code(7);
        }
    }
}

#[test]
fn test_schedule_enable_conflicts_with_disable() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .args(["lighting", "schedule", "--enable", "--disable"])
        .assert()
        .code(2);
}

#[test]
fn test_non_http_backend_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .args(["--backend", "ftp://wall.local", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("http(s)"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_points_into_config_home() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .args(["config", "use", "greenhouse"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("greenhouse"));
}

#[test]
fn test_unknown_profile_flag() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .args(["--profile", "greenhouse", "status"])
        .assert()
        .code(4);
}

// ── Backend round-trips ─────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timestamp": "2024-06-15T06:00:00Z",
            "lighting_on": true,
            "water_level": 75.0,
            "nutrient_level": 60.0,
            "temperature": 22.5,
            "humidity": 58.0,
            "soil_moisture": 41.0
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = plantwall_cmd(home.path());
    cmd.args(["--backend", &server.uri(), "-o", "json", "status"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["lighting_on"], json!(true));
    assert_eq!(value["water_level"], json!(75.0));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_brightness_posts_value_and_prints_refetched_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/lighting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lighting_body(true, 40)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/lighting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lighting_body(true, 85)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/lighting"))
        .and(body_json(json!({ "brightness": 85 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = plantwall_cmd(home.path());
    cmd.args(["--backend", &server.uri(), "-o", "plain", "lighting", "brightness", "85"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("brightness=85"), "{stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Brightness set to 85%"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lighting_off_sends_enabled_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/lighting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lighting_body(true, 60)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/lighting"))
        .and(body_json(json!({ "enabled": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "toggled" })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = plantwall_cmd(home.path());
    cmd.args(["--backend", &server.uri(), "lighting", "off"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Lights switched off"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_manual_watering_sends_duration() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/watering"))
        .respond_with(ResponseTemplate::new(200).set_body_json(watering_body(false)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/watering"))
        .and(body_json(json!({ "duration": 60, "auto_mode": false })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "watering started" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = plantwall_cmd(home.path());
    cmd.args(["--backend", &server.uri(), "watering", "start", "-d", "60"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Manual watering started for 60 seconds")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_emergency_stop_refuses_watering() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/watering"))
        .respond_with(ResponseTemplate::new(200).set_body_json(watering_body(true)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/watering"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(0)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = plantwall_cmd(home.path());
    cmd.args(["--backend", &server.uri(), "watering", "start"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(6), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Emergency stop is active"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unexpected_ack_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/lighting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lighting_body(false, 60)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/lighting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "queued" })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = plantwall_cmd(home.path());
    cmd.args(["--backend", &server.uri(), "lighting", "toggle"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(6), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Failed to toggle lighting"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_reports_backend_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2024-06-15T06:00:00Z"
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut cmd = plantwall_cmd(home.path());
    cmd.args(["--backend", &server.uri(), "health"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("System health check: healthy"));
}

#[test]
fn test_unreachable_backend_exit_code() {
    let home = tempfile::tempdir().unwrap();
    plantwall_cmd(home.path())
        .args(["--backend", "http://127.0.0.1:9", "--timeout", "2", "sensors"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not reach the backend"));
}
