//! Plain-text extraction from PDF bytes.
//!
//! Extraction reads embedded text only. Scanned documents without a text
//! layer come back empty or nearly so; no OCR is attempted.

use std::fs;
use std::path::Path;

use crate::error::AiError;

/// Extract the text content of a PDF held in memory.
pub fn extract_text(bytes: &[u8]) -> Result<String, AiError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AiError::Extraction(e.to_string()))
        .inspect_err(|e| tracing::error!(error = %e, "text extraction failed"))
}

/// Read a PDF from disk and extract its text content.
pub fn extract_text_from_file(path: impl AsRef<Path>) -> Result<String, AiError> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| AiError::Extraction(format!("{}: {}", path.display(), e)))?;
    extract_text(&bytes)
}
