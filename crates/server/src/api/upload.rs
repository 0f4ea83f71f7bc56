//! `POST /upload`: multipart in, zip out.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use tracing::{debug, error};
use ppt2pdf_core::{PreparedArchive, RequestState, ServiceError, UploadItem};

use crate::metrics::{UPLOADED_BYTES_TOTAL, UPLOADED_FILES_TOTAL};
use crate::state::AppState;

/// Multipart field carrying the presentations.
pub const FILES_FIELD: &str = "files";

/// Plain-text error answer.
#[derive(Debug)]
pub struct UploadError {
    status: StatusCode,
    message: String,
}

impl UploadError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for UploadError {
    fn from(err: ServiceError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.to_string())
    }
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

/// POST /upload
///
/// Converts every `files` part and answers with `converted_pdfs.zip`.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, UploadError> {
    let items = read_uploads(&mut multipart).await?;
    let prepared = state.service().process(items).await?;
    archive_response(prepared).await
}

/// Collects the `files` parts in the order they were sent.
///
/// A part with neither a file name nor content is what browsers send for an
/// empty file input, so it does not count as an upload.
async fn read_uploads(multipart: &mut Multipart) -> Result<Vec<UploadItem>, UploadError> {
    let mut items = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let data = field.bytes().await?;

        if file_name.as_deref().unwrap_or_default().is_empty() && data.is_empty() {
            continue;
        }

        UPLOADED_FILES_TOTAL.inc();
        UPLOADED_BYTES_TOTAL.inc_by(data.len() as u64);
        items.push(UploadItem { file_name, data });
    }

    Ok(items)
}

/// Streams the archive from disk.
///
/// The open handle keeps the file readable even if the workspace is
/// reclaimed while the body is still being sent.
async fn archive_response(prepared: PreparedArchive) -> Result<Response, UploadError> {
    let file = tokio::fs::File::open(&prepared.path).await.map_err(|e| {
        error!(
            request_id = %prepared.request_id,
            path = %prepared.path.display(),
            error = %e,
            "Failed to open archive"
        );
        prepared.reclaim.reclaim_now();
        UploadError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Server error: {}", e),
        )
    })?;

    debug!(request_id = %prepared.request_id, state = %RequestState::Served, "Request state");

    let disposition = format!("attachment; filename=\"{}\"", prepared.file_name());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, prepared.size.to_string()),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
