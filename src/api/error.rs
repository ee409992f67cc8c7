use crate::utils::error::CadError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API-layer error type
#[derive(Debug)]
pub enum ApiError {
    /// 400 - request has no `file` part
    NoFilePart,

    /// 400 - `file` part with an empty filename
    NoSelectedFile,

    /// 400 - extension outside the allow-list
    FileTypeNotAllowed,

    /// Malformed or oversized multipart body; status comes from the extractor
    Multipart(MultipartError),

    /// 500 - a format handler failed
    Processing(CadError),

    /// 503 - sensor simulation switched off in config
    SensorsDisabled,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NoFilePart => bad_request("No file part"),
            ApiError::NoSelectedFile => bad_request("No selected file"),
            ApiError::FileTypeNotAllowed => bad_request("File type not allowed"),
            ApiError::Multipart(err) => {
                tracing::warn!("Multipart error: {}", err);
                (err.status(), Json(json!({ "error": err.body_text() }))).into_response()
            }
            ApiError::Processing(err) => {
                // 完整錯誤只記在 log，回傳給 client 的是安全版本
                tracing::error!(
                    "❌ Processing failed: {} (suggestion: {})",
                    err,
                    err.recovery_suggestion()
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "status": "error",
                        "message": err.user_friendly_message(),
                    })),
                )
                    .into_response()
            }
            ApiError::SensorsDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "Sensor simulation disabled" })),
            )
                .into_response(),
        }
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl From<CadError> for ApiError {
    fn from(err: CadError) -> Self {
        match err {
            CadError::UnsupportedFormat { .. } => ApiError::FileTypeNotAllowed,
            other => ApiError::Processing(other),
        }
    }
}
