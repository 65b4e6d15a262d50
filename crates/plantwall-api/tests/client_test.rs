#![allow(clippy::unwrap_used)]
// Integration tests for `PlantWallClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use plantwall_api::{Error, LightingControl, PlantWallClient, TransportConfig, WateringControl};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PlantWallClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = PlantWallClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2024-06-15T10:30:00Z",
            "version": "1.2.0"
        })))
        .mount(&server)
        .await;

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version.as_deref(), Some("1.2.0"));
}

#[tokio::test]
async fn test_system_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timestamp": "2024-06-15T10:30:00Z",
            "lighting_on": false,
            "water_level": 75.5,
            "nutrient_level": 68.2,
            "temperature": 23.4,
            "humidity": 65.8,
            "soil_moisture": 45.2
        })))
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();
    assert!(!status.lighting_on);
    assert!((status.water_level - 75.5).abs() < f64::EPSILON);
    assert!((status.soil_moisture - 45.2).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_lighting_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/lighting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_on": true,
            "brightness": 80,
            "power_usage": 42.0,
            "schedule_enabled": true,
            "last_changed": "2024-06-15T07:00:00Z"
        })))
        .mount(&server)
        .await;

    let lighting = client.lighting().await.unwrap();
    assert!(lighting.is_on);
    assert_eq!(lighting.brightness, 80);
    assert!(lighting.schedule_enabled);
}

#[tokio::test]
async fn test_sensor_data() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperature": 21.5,
            "humidity": 58.0,
            "soil_moisture_0": 44.0,
            "soil_moisture_1": 39.0,
            "ph_level": 6.4,
            "light_level": 820.0,
            "water_level": 70.0,
            "timestamp": "2024-06-15T10:30:00Z"
        })))
        .mount(&server)
        .await;

    let sensors = client.sensors().await.unwrap();
    assert_eq!(sensors.soil_moisture_channels().len(), 2);
    assert!(sensors.ph_level.is_some());
    assert!(sensors.ec_level.is_none());
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_lighting_sends_partial_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/lighting"))
        .and(body_json(json!({ "brightness": 35 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "toggled" })))
        .expect(1)
        .mount(&server)
        .await;

    let control = LightingControl {
        brightness: Some(35),
        ..LightingControl::default()
    };
    let ack = client.update_lighting(&control).await.unwrap();
    assert_eq!(ack.status, "toggled");
}

#[tokio::test]
async fn test_update_watering() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/watering"))
        .and(body_json(json!({ "duration": 45, "auto_mode": false })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "watering started" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let control = WateringControl {
        duration: Some(45),
        auto_mode: Some(false),
        schedule: None,
    };
    let ack = client.update_watering(&control).await.unwrap();
    assert_eq!(ack.status, "watering started");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/watering"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to find watering pin",
            "timestamp": "2024-06-15T10:30:00Z"
        })))
        .mount(&server)
        .await;

    match client.watering().await {
        Err(Error::Http { status, ref message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to find watering pin");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_error_is_previewed() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/lighting"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Failed to find lighting pin\n"))
        .mount(&server)
        .await;

    let result = client.update_lighting(&LightingControl::default()).await;
    match result {
        Err(Error::Http { ref message, .. }) => {
            assert_eq!(message, "Failed to find lighting pin");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "lighting_on": "yes" })))
        .mount(&server)
        .await;

    let result = client.status().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_timeout_is_normalized() {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_timeout(Duration::from_millis(100));
    let client = PlantWallClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/lighting"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let result = client.lighting().await;
    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout error, got: {result:?}"
    );
}
