//! Conversion endpoint
//!
//! `POST /api/convert` with a multipart body whose `zipFile` field carries the
//! site archive. The upload is streamed to disk, checked for a ZIP signature,
//! and handed to a background job; the response is that job's NDJSON progress
//! stream.
//!
//! Rejections before the job starts are plain JSON errors:
//! - no `zipFile` field, empty file or non-ZIP content → 400
//! - upload larger than the configured ceiling → 413

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Response,
    routing::post,
    Router,
};
use sitelift_common::ndjson::ndjson_response;
use std::path::Path;
use std::sync::atomic::Ordering;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::{ConvertSettings, UPLOAD_FIELD};
use crate::error::{ApiError, ApiResult};
use crate::workflow::{progress_channel, run_conversion, ConversionJob};
use crate::AppState;

/// Local file header and end-of-central-directory (empty archive) signatures
const ZIP_SIGNATURES: [[u8; 4]; 2] = [*b"PK\x03\x04", *b"PK\x05\x06"];

/// Allowance for multipart framing on top of the file ceiling
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// True when `head` starts with a ZIP signature
pub fn has_zip_signature(head: &[u8]) -> bool {
    head.len() >= 4 && ZIP_SIGNATURES.iter().any(|sig| head[..4] == sig[..])
}

/// POST /api/convert
pub async fn convert_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let settings = state.settings.clone();
    let job = ConversionJob::new(&settings);

    match receive_upload(&mut multipart, &job.upload_path, &settings).await {
        Ok(()) => {}
        Err(e) => {
            discard(&job.upload_path).await;
            warn!(job_id = %job.id, error = %e, "Upload rejected");
            return Err(e);
        }
    }

    let (reporter, events) = progress_channel();
    let job_id = job.id;
    info!(job_id = %job_id, stamp = %job.stamp, "Upload accepted, conversion queued");

    tokio::spawn(async move {
        match run_conversion(job, &state.settings, reporter).await {
            Ok(_) => {
                state.jobs_completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                state.jobs_failed.fetch_add(1, Ordering::Relaxed);
                *state.last_error.write().await = Some(e.to_string());
                debug!(job_id = %job_id, "Failure recorded for health endpoint");
            }
        }
    });

    Ok(ndjson_response(events))
}

/// Stream the `zipFile` field to `dest`, enforcing the size ceiling and the
/// ZIP signature check. Other fields are drained and ignored.
async fn receive_upload(
    multipart: &mut Multipart,
    dest: &Path,
    settings: &ConvertSettings,
) -> ApiResult<()> {
    let mut found = false;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) || found {
            while field.chunk().await?.is_some() {}
            continue;
        }
        found = true;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = File::create(dest).await?;
        let mut written: u64 = 0;
        let mut head = Vec::with_capacity(4);

        while let Some(chunk) = field.chunk().await? {
            written += chunk.len() as u64;
            if written > settings.max_upload_bytes {
                return Err(ApiError::PayloadTooLarge(format!(
                    "Upload exceeds the {} byte limit",
                    settings.max_upload_bytes
                )));
            }
            if head.len() < 4 {
                let take = (4 - head.len()).min(chunk.len());
                head.extend_from_slice(&chunk[..take]);
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if !has_zip_signature(&head) {
            return Err(ApiError::BadRequest(
                "Only ZIP files are allowed".to_string(),
            ));
        }
        debug!("Received upload: {} bytes -> {}", written, dest.display());
    }

    if !found {
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    }
    Ok(())
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove rejected upload {}: {}", path.display(), e);
        }
    }
}

/// Build conversion routes; the body limit leaves room for multipart framing
pub fn convert_routes(max_upload_bytes: u64) -> Router<AppState> {
    let limit = usize::try_from(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD))
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/api/convert", post(convert_upload))
        .layer(DefaultBodyLimit::max(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_signatures() {
        assert!(has_zip_signature(b"PK\x03\x04rest"));
        assert!(has_zip_signature(b"PK\x05\x06"));
        assert!(!has_zip_signature(b"PK"));
        assert!(!has_zip_signature(b"<html>"));
        assert!(!has_zip_signature(b""));
    }
}
