#![allow(clippy::unwrap_used)]
// Integration tests for the `Dashboard` facade.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use plantwall_core::{CoreError, Dashboard, DashboardConfig, PanelConfig};

async fn mock_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mock_all(server: &MockServer, emergency_stop: bool) {
    mock_get(
        server,
        "/api/status",
        json!({
            "timestamp": "2024-06-15T10:30:00Z",
            "lighting_on": true,
            "water_level": 75.5,
            "nutrient_level": 68.2,
            "temperature": 23.4,
            "humidity": 65.8,
            "soil_moisture": 45.2
        }),
    )
    .await;
    mock_get(
        server,
        "/api/sensors",
        json!({
            "temperature": 21.5,
            "humidity": 58.0,
            "soil_moisture_0": 44.0,
            "light_level": 820.0,
            "water_level": 70.0,
            "timestamp": "2024-06-15T10:30:00Z"
        }),
    )
    .await;
    mock_get(
        server,
        "/api/lighting",
        json!({
            "is_on": true,
            "brightness": 80,
            "power_usage": 42.0,
            "schedule_enabled": true,
            "last_changed": "2024-06-15T07:00:00Z"
        }),
    )
    .await;
    mock_get(
        server,
        "/api/watering",
        json!({
            "is_running": false,
            "water_level": 64.0,
            "last_watering": "2024-06-15T06:00:00Z",
            "emergency_stop": emergency_stop,
            "auto_mode": false
        }),
    )
    .await;
}

fn config(server: &MockServer) -> DashboardConfig {
    let mut cfg = DashboardConfig::new(Url::parse(&server.uri()).unwrap());
    cfg.panel = PanelConfig {
        poll_interval: Duration::from_secs(60),
        settle_delay: Duration::from_millis(50),
        banner_ttl: Duration::from_millis(200),
    };
    cfg
}

#[tokio::test]
async fn health_check_reports_backend_status() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/api/health",
        json!({ "status": "healthy", "timestamp": "2024-06-15T10:30:00Z" }),
    )
    .await;

    let dashboard = Dashboard::new(config(&server)).unwrap();
    let check = dashboard.check_health().await;
    assert!(check.is_ok());
    assert_eq!(check.message(), "System health check: healthy");
}

#[tokio::test]
async fn failed_health_check_reads_as_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(config(&server)).unwrap();
    let check = dashboard.check_health().await;
    assert!(!check.is_ok());
    assert_eq!(
        check.message(),
        "Health check failed - backend may be unavailable"
    );
}

#[tokio::test]
async fn system_health_is_derived_from_panels() {
    let server = MockServer::start().await;
    mock_all(&server, false).await;

    let dashboard = Dashboard::new(config(&server)).unwrap();
    assert!(!dashboard.system_health().overall);

    dashboard.refresh_all().await.unwrap();
    let health = dashboard.system_health();
    assert!(health.sensors && health.lighting && health.watering && health.display);
    assert!(health.overall);
}

#[tokio::test]
async fn emergency_stop_marks_watering_unhealthy() {
    let server = MockServer::start().await;
    mock_all(&server, true).await;

    let dashboard = Dashboard::new(config(&server)).unwrap();
    dashboard.refresh_all().await.unwrap();

    let health = dashboard.system_health();
    assert!(!health.watering);
    assert!(health.lighting);
    assert!(!health.overall);
}

#[tokio::test]
async fn mount_loads_every_panel() {
    let server = MockServer::start().await;
    mock_all(&server, false).await;

    let dashboard = Dashboard::new(config(&server)).unwrap();
    let mut lighting = dashboard.lighting().subscribe();
    let mut watering = dashboard.watering().subscribe();
    dashboard.mount().await.unwrap();
    assert!(matches!(
        dashboard.mount().await,
        Err(CoreError::AlreadyMounted)
    ));

    let timeout = Duration::from_secs(3);
    tokio::time::timeout(timeout, lighting.wait_for(|s| !s.is_loading()))
        .await
        .unwrap()
        .unwrap();
    tokio::time::timeout(timeout, watering.wait_for(|s| !s.is_loading()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(dashboard.lighting().state().form.brightness, 80);
    dashboard.shutdown().await;
    assert!(dashboard.watering().state().is_disposed());
}

#[tokio::test]
async fn oneshot_runs_and_returns_result() {
    let server = MockServer::start().await;
    mock_all(&server, false).await;

    let level = Dashboard::oneshot(config(&server), |d| async move {
        d.overview().refresh().await?;
        Ok(d.overview().state().status.map(|s| s.water_level))
    })
    .await
    .unwrap();
    assert_eq!(level, Some(75.5));
}

#[tokio::test]
async fn unreachable_backend_maps_to_connection_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let cfg = DashboardConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
    let dashboard = Dashboard::new(cfg).unwrap();
    let err = dashboard.overview().refresh().await.unwrap_err();
    assert!(err.is_unreachable(), "expected unreachable, got: {err:?}");
}
