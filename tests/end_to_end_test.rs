use cad_probe::core::sensors::SensorFeed;
use cad_probe::{router, AppState, UploadDir};
use reqwest::multipart::{Form, Part};
use std::net::SocketAddr;
use std::time::Duration;
use tempfile::TempDir;

const CUBE: [[[f32; 3]; 3]; 12] = [
    [[0., 0., 0.], [1., 1., 0.], [1., 0., 0.]],
    [[0., 0., 0.], [0., 1., 0.], [1., 1., 0.]],
    [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.]],
    [[0., 0., 1.], [1., 1., 1.], [0., 1., 1.]],
    [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.]],
    [[0., 0., 0.], [1., 0., 1.], [0., 0., 1.]],
    [[0., 1., 0.], [1., 1., 1.], [1., 1., 0.]],
    [[0., 1., 0.], [0., 1., 1.], [1., 1., 1.]],
    [[0., 0., 0.], [0., 0., 1.], [0., 1., 1.]],
    [[0., 0., 0.], [0., 1., 1.], [0., 1., 0.]],
    [[1., 0., 0.], [1., 1., 0.], [1., 1., 1.]],
    [[1., 0., 0.], [1., 1., 1.], [1., 0., 1.]],
];

fn binary_cube() -> Vec<u8> {
    let mut data = vec![0u8; 80];
    data.extend_from_slice(&(CUBE.len() as u32).to_le_bytes());
    for triangle in CUBE {
        data.extend_from_slice(&[0u8; 12]);
        for vertex in triangle {
            for coord in vertex {
                data.extend_from_slice(&coord.to_le_bytes());
            }
        }
        data.extend_from_slice(&[0u8; 2]);
    }
    data
}

async fn spawn_server(upload_dir: &std::path::Path) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let uploads = UploadDir::open(upload_dir).unwrap();
    let (feed, _sensor_task) = SensorFeed::spawn(Duration::from_millis(100));
    let app = router(AppState::new(uploads, Some(feed), 16 * 1024 * 1024));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, server)
}

#[tokio::test]
async fn test_upload_cube_over_http() {
    let temp = TempDir::new().unwrap();
    let (addr, server) = spawn_server(temp.path()).await;
    let client = reqwest::Client::new();

    let form = Form::new().part(
        "file",
        Part::bytes(binary_cube())
            .file_name("cube.stl")
            .mime_str("application/octet-stream")
            .unwrap(),
    );
    let response = client
        .post(format!("http://{}/api/cad", addr))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let uploaded = response.bytes().await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&uploaded).unwrap();

    assert_eq!(json["vertices"].as_array().unwrap().len(), 8);
    assert_eq!(json["faces"].as_array().unwrap().len(), 12);
    // 12 cube edges plus one diagonal per side
    assert_eq!(json["edges"].as_array().unwrap().len(), 18);
    assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());

    let cached = client
        .get(format!("http://{}/api/cad/result", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(cached.status(), reqwest::StatusCode::OK);
    assert_eq!(cached.bytes().await.unwrap(), uploaded);

    server.abort();
}

#[tokio::test]
async fn test_rejected_upload_over_http() {
    let temp = TempDir::new().unwrap();
    let (addr, server) = spawn_server(temp.path()).await;

    let form = Form::new().part("file", Part::bytes(b"hello".to_vec()).file_name("notes.txt"));
    let response = reqwest::Client::new()
        .post(format!("http://{}/upload", addr))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["error"], "File type not allowed");

    server.abort();
}

#[tokio::test]
async fn test_sensors_over_http() {
    let temp = TempDir::new().unwrap();
    let (addr, server) = spawn_server(temp.path()).await;

    let response = reqwest::get(format!("http://{}/api/sensors", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let json: serde_json::Value = response.json().await.unwrap();
    let temperature = json["temperature"].as_f64().unwrap();
    assert!((100.0..=150.0).contains(&temperature));
    assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));

    server.abort();
}
