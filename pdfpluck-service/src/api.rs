//! HTTP API for the pdfpluck service.
//!
//! Endpoints:
//! - `POST /extract_image` — upload a PDF, extract its embedded images
//! - `GET /images/{filename}` — serve an extracted image
//! - `GET /health` — service health

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::StaticConfig;
use crate::extraction::ExtractionService;

pub mod extract;
pub mod images;
use extract::extract_image_handler;
use images::serve_image_handler;

/// Application state
pub struct AppState {
    pub service: Arc<ExtractionService>,
    pub config: Arc<StaticConfig>,
    pub start_time: Instant,
}

/// Build the API router
pub fn router(service: Arc<ExtractionService>, config: Arc<StaticConfig>) -> Router {
    let max_body_size = config.limits.max_upload_size_bytes as usize;

    let state = Arc::new(AppState {
        service,
        config,
        start_time: Instant::now(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route(
            "/extract_image",
            post(extract_image_handler).layer(DefaultBodyLimit::max(max_body_size)),
        )
        .route("/images/{filename}", get(serve_image_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Home ===

async fn home_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Nothing here".to_string(),
    })
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

// === Health ===

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
}
