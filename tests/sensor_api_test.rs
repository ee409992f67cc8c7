use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use cad_probe::core::sensors::{SensorFeed, PRESSURE_RANGE, STRESS_RANGE, TEMPERATURE_RANGE};
use cad_probe::{router, AppState, UploadDir};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(temp: &TempDir, sensors: Option<SensorFeed>) -> Router {
    let uploads = UploadDir::open(temp.path()).unwrap();
    router(AppState::new(uploads, sensors, 16 * 1024 * 1024))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn has_two_decimals(value: f64) -> bool {
    ((value * 100.0).round() / 100.0 - value).abs() < 1e-9
}

fn check_snapshot(body: &str) -> DateTime<Utc> {
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 4);

    let timestamp = json["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), 20);
    assert!(timestamp.ends_with('Z'));
    let parsed = DateTime::parse_from_rfc3339(timestamp)
        .unwrap()
        .with_timezone(&Utc);

    let temperature = json["temperature"].as_f64().unwrap();
    let pressure = json["pressure"].as_f64().unwrap();
    let stress = json["stress"].as_f64().unwrap();

    assert!(TEMPERATURE_RANGE.contains(&temperature));
    assert!(PRESSURE_RANGE.contains(&pressure));
    assert!(STRESS_RANGE.contains(&stress));
    for value in [temperature, pressure, stress] {
        assert!(has_two_decimals(value), "{}", value);
    }

    parsed
}

#[tokio::test]
async fn test_sensor_snapshot_shape_and_ranges() {
    let temp = TempDir::new().unwrap();
    let (feed, task) = SensorFeed::spawn(Duration::from_millis(50));
    let app = app(&temp, Some(feed));

    let (status, body) = get(app, "/api/sensors").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(r#"{"timestamp":""#));
    check_snapshot(&body);

    task.abort();
}

#[tokio::test]
async fn test_sensor_timestamps_do_not_go_backwards() {
    let temp = TempDir::new().unwrap();
    let (feed, task) = SensorFeed::spawn(Duration::from_millis(100));
    let app = app(&temp, Some(feed));

    let (_, first) = get(app.clone(), "/api/sensors").await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let (_, second) = get(app, "/api/sensors").await;

    let first = check_snapshot(&first);
    let second = check_snapshot(&second);
    assert!(second > first);

    task.abort();
}

#[tokio::test]
async fn test_disabled_sensors_return_503() {
    let temp = TempDir::new().unwrap();
    let (status, body) = get(app(&temp, None), "/api/sensors").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Sensor simulation disabled");
}

#[tokio::test]
async fn test_health() {
    let temp = TempDir::new().unwrap();
    let (status, body) = get(app(&temp, None), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
