//! Résumé upload handling: accepts PDF only and turns it into plain text.

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

const PDF_MIME: &str = "application/pdf";

/// A file counts as a PDF when either its declared type or its name says so.
pub fn is_pdf(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let by_type = content_type.is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_MIME));
    let by_name = file_name.is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));
    by_type || by_name
}

/// Extracts text from PDF bytes on a blocking thread.
///
/// Unparseable documents are `UnprocessableEntity`; documents without any
/// text layer are a `Validation` error.
pub async fn extract_resume_text(data: Bytes) -> Result<String, AppError> {
    let size = data.len();
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| {
            // pdf-extract panics on some malformed documents
            if e.is_panic() {
                AppError::UnprocessableEntity("Resume PDF could not be parsed".to_string())
            } else {
                AppError::Internal(e.into())
            }
        })?
        .map_err(|e| AppError::UnprocessableEntity(format!("Resume PDF could not be parsed: {e:?}")))?;

    let text = extracted.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the resume".to_string(),
        ));
    }

    debug!("Extracted {} chars from {size}-byte resume", text.len());
    Ok(text)
}
