//! Serving extracted images by identifier.

use std::io::ErrorKind;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::{ServiceError, ServiceResult};
use crate::extraction::naming;

use super::AppState;

/// Serve a previously extracted image by its identifier.
pub async fn serve_image_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ServiceResult<Response> {
    // Identifiers are single path segments; anything else is not ours.
    if filename.contains(['/', '\\']) || filename.contains("..") {
        return Err(ServiceError::InvalidRequest {
            message: "Invalid image identifier".to_string(),
        });
    }

    let path = state.config.storage.extracted_dir.join(&filename);
    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Err(ServiceError::ImageNotFound {
                image_id: filename,
            });
        }
        Err(error) => {
            return Err(ServiceError::Internal {
                message: error.to_string(),
            });
        }
    };

    let content_type = if filename.ends_with(naming::CANONICAL_EXTENSION) {
        "image/png"
    } else {
        "application/octet-stream"
    };

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], data).into_response())
}
