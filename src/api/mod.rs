mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/", get(handlers::api_index))
        .route("/upload", post(handlers::upload))
        .route("/api/cad", post(handlers::upload))
        .route("/api/cad/result", get(handlers::last_result))
        .route("/api/sensors", get(handlers::sensors))
        .route("/health", get(handlers::health))
        // Oversized bodies are rejected before any handler runs
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
