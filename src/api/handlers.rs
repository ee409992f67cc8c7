use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::ApiError;
use super::state::AppState;
use crate::core::inspector;
use crate::domain::model::SensorSnapshot;
use crate::utils::error::CadError;
use crate::utils::validation::{allowed_file, sanitize_filename};

struct UploadedFile {
    filename: String,
    data: Bytes,
}

fn upload_form(action: &str) -> String {
    format!(
        r#"
    <!doctype html>
    <title>Upload CAD File (STEP/IGES/STL)</title>
    <h1>Upload CAD File</h1>
    <form method="post" enctype="multipart/form-data" action="{}">
      <input type="file" name="file">
      <input type="submit" value="Upload">
    </form>
    "#,
        action
    )
}

/// GET / - upload form posting to /upload
pub async fn index() -> Html<String> {
    Html(upload_form("/upload"))
}

/// GET /api/ - upload form posting to /api/cad
pub async fn api_index() -> Html<String> {
    Html(upload_form("/api/cad"))
}

fn json_bytes(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Pull the `file` part out of the form, skipping any other fields.
async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => return Err(ApiError::NoFilePart),
        };
        if filename.is_empty() {
            return Err(ApiError::NoSelectedFile);
        }

        let data = field.bytes().await?;
        return Ok(UploadedFile { filename, data });
    }

    Err(ApiError::NoFilePart)
}

/// POST /upload, POST /api/cad - inspect an uploaded CAD file
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    // 不是 multipart 的請求就當作沒有 file
    let mut multipart = multipart.map_err(|_| ApiError::NoFilePart)?;
    let upload = read_file_field(&mut multipart).await?;

    if !allowed_file(&upload.filename) {
        return Err(ApiError::FileTypeNotAllowed);
    }

    let filename = sanitize_filename(&upload.filename);
    if !allowed_file(&filename) {
        tracing::warn!(
            "Rejected upload: '{}' lost its extension when sanitized",
            upload.filename
        );
        return Err(ApiError::FileTypeNotAllowed);
    }

    tracing::info!("📥 Received {} ({} bytes)", filename, upload.data.len());

    let staged = state.uploads.stage(&filename, upload.data).await?;
    let outcome = inspector::inspect_file(staged.path(), &filename).await;
    staged.discard().await;
    let inspection = outcome?;

    let body = Bytes::from(serde_json::to_vec(&inspection).map_err(CadError::from)?);
    state.results.store(body.clone()).await;

    tracing::info!("✅ Processed {}", filename);
    Ok(json_bytes(body))
}

/// GET /api/cad/result - body of the most recent successful upload
pub async fn last_result(State(state): State<Arc<AppState>>) -> Response {
    match state.results.latest().await {
        Some(body) => json_bytes(body),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /api/sensors - current simulated readings
pub async fn sensors(State(state): State<Arc<AppState>>) -> Result<Json<SensorSnapshot>, ApiError> {
    let feed = state.sensors.as_ref().ok_or(ApiError::SensorsDisabled)?;
    Ok(Json(SensorSnapshot::at(feed.latest(), Utc::now())))
}

/// GET /health - Health check
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
