//! Upload-and-extract endpoint.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
};
use axum_extra::extract::Host;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::StaticConfig;
use crate::error::{ExtractError, ServiceError, ServiceResult};

use super::AppState;

/// Response for the extraction endpoint
#[derive(Serialize)]
pub struct ExtractResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Accept a PDF upload, run the extraction pipeline, and return public
/// URLs for the extracted images.
pub async fn extract_image_handler(
    State(state): State<Arc<AppState>>,
    Host(host): Host,
    mut multipart: Multipart,
) -> ServiceResult<Json<ExtractResponse>> {
    let mut file: Option<(Vec<u8>, String)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or("").to_string();
            let data = field.bytes().await.map_err(|e| ServiceError::InvalidRequest {
                message: e.to_string(),
            })?;
            file = Some((data.to_vec(), filename));
        }
    }

    let (data, filename) = file.ok_or_else(|| ServiceError::InvalidRequest {
        message: "No file part".to_string(),
    })?;
    if filename.is_empty() {
        return Err(ServiceError::InvalidRequest {
            message: "No selected file".to_string(),
        });
    }
    if !has_pdf_extension(&filename) {
        return Err(ServiceError::InvalidRequest {
            message: "Invalid file type".to_string(),
        });
    }

    // Stage the upload before extraction so failed runs stay inspectable.
    let staged_path = state
        .config
        .storage
        .upload_dir
        .join(format!("{}.pdf", Uuid::new_v4()));
    tokio::fs::write(&staged_path, &data)
        .await
        .map_err(|e| ServiceError::Extraction(ExtractError::Staging(e)))?;

    // The pipeline is synchronous and CPU-bound; keep it off the runtime.
    let service = state.service.clone();
    let report = tokio::task::spawn_blocking(move || service.extract_from_bytes(&data))
        .await
        .map_err(|e| ServiceError::Internal {
            message: e.to_string(),
        })??;

    let identifiers = report.saved_identifiers();
    info!(
        saved = identifiers.len(),
        duplicates = report.duplicate_count(),
        failures = report.failure_count(),
        upload = %staged_path.display(),
        "Extraction run finished"
    );

    if identifiers.is_empty() {
        return Ok(Json(ExtractResponse {
            message: "No images found in the PDF".to_string(),
            images: None,
        }));
    }

    let base = public_base(&state.config, &host);
    let images = identifiers
        .into_iter()
        .map(|identifier| format!("{base}/images/{identifier}"))
        .collect();

    Ok(Json(ExtractResponse {
        message: "Images extracted successfully".to_string(),
        images: Some(images),
    }))
}

fn has_pdf_extension(filename: &str) -> bool {
    filename.contains('.')
        && filename
            .rsplit('.')
            .next()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn public_base(config: &StaticConfig, host: &str) -> String {
    match &config.server.public_base_url {
        Some(base) => base.trim_end_matches('/').to_string(),
        None => format!("http://{host}"),
    }
}
