//! Error types for sitelift-convert
//!
//! `ApiError` covers rejections made before a progress stream opens.
//! `ConversionError` covers failures inside a running job; its display text is
//! the message carried by the terminal `error` event.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::services::{AnalyzeError, ExtractError, PackageError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload exceeds the configured ceiling (413)
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed multipart body; status comes from the parser
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// sitelift-common error
    #[error("Common error: {0}")]
    Common(#[from] sitelift_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg)
            }
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            ApiError::Multipart(ref err) => (err.status(), "BAD_MULTIPART", err.body_text()),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a running conversion job
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalyzeError),

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Packaging failed: {0}")]
    Packaging(#[from] PackageError),

    #[error("Conversion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ConversionError {
    /// Adapter for `map_err` on filesystem calls
    pub fn fs(path: impl AsRef<Path>) -> impl FnOnce(std::io::Error) -> ConversionError {
        let path = path.as_ref().to_path_buf();
        move |source| ConversionError::Filesystem { path, source }
    }
}

/// Result type for pipeline stages
pub type ConversionResult<T> = Result<T, ConversionError>;
