//! Document loading and saving.
//!
//! Parsing and serialization are delegated to `lopdf`; this module only
//! moves bytes between disk and the in-memory `Document` and wraps failures
//! in the crate error type.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lopdf::Document;
use serde::{Deserialize, Serialize};

use crate::error::PdfDeckError;

/// Metadata for a user-selected input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl SourceFile {
    /// Build the record from a path on disk, reading size and mtime.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, PdfDeckError> {
        let path = path.into();
        let metadata = fs::metadata(&path)
            .map_err(|e| PdfDeckError::LoadError(format!("{}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.eq_ignore_ascii_case("pdf"))
            .map(|_| "application/pdf".to_string());
        Ok(SourceFile {
            name,
            size: metadata.len(),
            mime_type,
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            path,
        })
    }
}

/// Read a PDF file and parse it.
pub fn load_document(path: &Path) -> Result<Document, PdfDeckError> {
    let bytes = fs::read(path)
        .map_err(|e| PdfDeckError::LoadError(format!("{}: {}", path.display(), e)))?;
    let doc = Document::load_mem(&bytes)
        .map_err(|e| PdfDeckError::LoadError(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), pages = doc.get_pages().len(), "loaded PDF");
    Ok(doc)
}

/// Serialize a document and write it to `path`.
///
/// Callers write to a temp path first and promote the result via
/// [`crate::workspace::Workspace::commit`], so a failure here never leaves a
/// partial file at a permanent location.
pub fn save_document(doc: &mut Document, path: &Path) -> Result<(), PdfDeckError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfDeckError::SaveError(format!("Save failed: {}", e)))?;
    fs::write(path, &buffer)
        .map_err(|e| PdfDeckError::SaveError(format!("{}: {}", path.display(), e)))?;
    Ok(())
}
