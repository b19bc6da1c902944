//! PDF text extraction for resume and job-description uploads.

use axum::{extract::Multipart, Json};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;

/// Upload size limit for the extraction route.
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

const PDF_FIELD: &str = "pdf";
const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Serialize)]
pub struct ExtractPdfResponse {
    pub text: String,
    pub file_name: String,
}

/// POST /api/v1/extract-pdf
///
/// Accepts a multipart upload with a `pdf` field and returns its plain text.
pub async fn handle_extract_pdf(
    mut multipart: Multipart,
) -> Result<Json<ExtractPdfResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }

        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::Validation("File must be a PDF".to_string()));
        }

        let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        info!("Extracting text from {file_name} ({} bytes)", data.len());
        let text = extract_text(data).await?;

        return Ok(Json(ExtractPdfResponse { text, file_name }));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// Runs `pdf-extract` on a blocking thread. Parser panics on malformed files
/// are reported as unprocessable input.
pub async fn extract_text(data: Bytes) -> Result<String, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| {
        if e.is_panic() {
            AppError::UnprocessableEntity("Failed to extract text from PDF".to_string())
        } else {
            AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
        }
    })?;

    result.map_err(|e| AppError::UnprocessableEntity(format!("Failed to extract text from PDF: {e}")))
}
