use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Image not found: {image_id}")]
    ImageNotFound { image_id: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Image extraction failed")]
    Extraction(#[from] ExtractError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Extraction pipeline errors
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Input bytes are not a readable PDF")]
    DocumentUnreadable(#[source] lopdf::Error),

    #[error("Failed to persist image {identifier}")]
    SinkWrite {
        identifier: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stage uploaded file")]
    Staging(#[source] std::io::Error),
}

/// Per-image normalization failures. These never abort an extraction run;
/// the pipeline logs them and moves on to the next image.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Image decode failed")]
    Decode(#[from] image::ImageError),

    #[error("Unsupported source encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Raster payload does not match its declared dimensions")]
    MalformedRaster,

    #[error("PNG encode failed")]
    Encode(#[source] image::ImageError),
}

/// API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::ImageNotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Extraction(ExtractError::DocumentUnreadable(_)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::ImageNotFound { .. } => "image_not_found",
            ServiceError::InvalidRequest { .. } => "invalid_request",
            ServiceError::Extraction(ExtractError::DocumentUnreadable(_)) => {
                "unreadable_document"
            }
            ServiceError::Extraction(ExtractError::SinkWrite { .. }) => "sink_write_failed",
            ServiceError::Extraction(ExtractError::Staging(_)) => "staging_failed",
            ServiceError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();

        let response = ErrorResponse {
            message: self.to_string(),
            code: Some(code),
            details: None,
        };

        (status, Json(response)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
