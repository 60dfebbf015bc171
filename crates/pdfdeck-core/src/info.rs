//! Document inspection.

use std::path::Path;

use lopdf::Document;
use serde::{Deserialize, Serialize};

use crate::document::{load_document, SourceFile};
use crate::error::PdfDeckError;
use crate::stamp::page_size;

/// Visible size of one page, after accounting for its rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDimensions {
    pub number: u32,
    pub width: f64,
    pub height: f64,
}

/// Summary of a document on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub file: SourceFile,
    pub page_count: u32,
    pub encrypted: bool,
    pub pages: Vec<PageDimensions>,
}

/// Inspect the document at `path`.
///
/// Page dimensions come from the effective MediaBox, with width and height
/// swapped when the page's `/Rotate` is 90 or 270. The encrypted flag
/// reflects the trailer's `Encrypt` entry.
pub fn document_info(path: &Path) -> Result<DocumentInfo, PdfDeckError> {
    let file = SourceFile::from_path(path)?;
    let doc = load_document(path)?;

    let page_map = doc.get_pages();
    let mut pages = Vec::with_capacity(page_map.len());
    for (number, page_id) in &page_map {
        let (mut width, mut height) = page_size(&doc, *page_id);
        if matches!(normalized_rotation(&doc, *page_id), 90 | 270) {
            std::mem::swap(&mut width, &mut height);
        }
        pages.push(PageDimensions {
            number: *number,
            width,
            height,
        });
    }

    Ok(DocumentInfo {
        file,
        page_count: page_map.len() as u32,
        encrypted: doc.trailer.has(b"Encrypt"),
        pages,
    })
}

/// Page count of the document at `path`.
pub fn get_page_count(path: &Path) -> Result<u32, PdfDeckError> {
    let doc = load_document(path)?;
    Ok(doc.get_pages().len() as u32)
}

/// The page's `/Rotate` value folded into `0..360`.
fn normalized_rotation(doc: &Document, page_id: lopdf::ObjectId) -> i64 {
    let rotation = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .and_then(|d| d.get(b"Rotate"))
        .and_then(|o| o.as_i64())
        .unwrap_or(0);
    rotation.rem_euclid(360)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::save_document;
    use crate::pages::test_pdf::create_test_pdf;
    use crate::pages::set_page_rotation;
    use lopdf::Document;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, page_count: u32) -> std::path::PathBuf {
        let path = dir.path().join("input.pdf");
        std::fs::write(&path, create_test_pdf(page_count)).unwrap();
        path
    }

    #[test]
    fn test_reports_pages_and_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, 2);

        let info = document_info(&path).unwrap();

        assert_eq!(info.page_count, 2);
        assert!(!info.encrypted);
        assert_eq!(info.file.name, "input.pdf");
        assert!(info.file.size > 0);
        assert_eq!(
            info.pages,
            vec![
                PageDimensions {
                    number: 1,
                    width: 612.0,
                    height: 792.0
                },
                PageDimensions {
                    number: 2,
                    width: 612.0,
                    height: 792.0
                },
            ]
        );
    }

    #[test]
    fn test_rotated_page_swaps_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, 2);

        let mut doc = Document::load(&path).unwrap();
        let page_id = doc.get_pages()[&1];
        set_page_rotation(&mut doc, page_id, 90).unwrap();
        save_document(&mut doc, &path).unwrap();

        let info = document_info(&path).unwrap();
        assert_eq!(info.pages[0].width, 792.0);
        assert_eq!(info.pages[0].height, 612.0);
        assert_eq!(info.pages[1].width, 612.0);
    }

    #[test]
    fn test_negative_rotation_normalizes() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, 1);

        let mut doc = Document::load(&path).unwrap();
        let page_id = doc.get_pages()[&1];
        set_page_rotation(&mut doc, page_id, -90).unwrap();
        save_document(&mut doc, &path).unwrap();

        let info = document_info(&path).unwrap();
        assert_eq!(info.pages[0].width, 792.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, 1);

        let info = document_info(&path).unwrap();
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"pageCount\":1"));
        assert!(json.contains("\"encrypted\":false"));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = TempDir::new().unwrap();
        let result = document_info(&dir.path().join("missing.pdf"));
        assert!(matches!(result, Err(PdfDeckError::LoadError(_))));
    }

    #[test]
    fn test_page_count_helper() {
        let dir = TempDir::new().unwrap();
        let path = write_input(&dir, 5);
        assert_eq!(get_page_count(&path).unwrap(), 5);
    }
}
