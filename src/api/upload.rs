//! Multipart upload reading.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;
use tracing::debug;

use super::error::ApiError;
use crate::model::UploadedFile;

/// Form field that carries the documents.
pub const DOCUMENTS_FIELD: &str = "documents";

/// Collect every file sent under the `documents` field.
///
/// Parts without a file name are skipped. An empty result is a 400.
/// Stream errors keep their status, so an oversize body is a 413.
pub async fn read_documents(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<UploadedFile>, ApiError> {
    let mut multipart =
        multipart.map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some(DOCUMENTS_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string)
        else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;

        let mut file = UploadedFile::new(file_name, bytes.to_vec());
        if let Some(ct) = content_type {
            file = file.with_content_type(ct);
        }
        debug!(file = %file.file_name, bytes = file.size(), "Received upload");
        files.push(file);
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("No documents provided"));
    }
    Ok(files)
}
