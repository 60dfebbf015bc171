//! Page extraction.
//!
//! Copies an explicit page list, in the order given, into a new document.
//! A page listed twice becomes two distinct page objects in the output.

use std::path::{Path, PathBuf};

use crate::document::{load_document, save_document};
use crate::error::PdfDeckError;
use crate::options::ExtractOptions;
use crate::pages::PageCopier;
use crate::progress::Progress;
use crate::workspace::Workspace;

/// Extract the listed pages of `file`. Progress ticks once per page.
pub fn extract_pages(
    workspace: &Workspace,
    file: &Path,
    options: &ExtractOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    run(workspace, file, options, progress).inspect_err(|e| {
        tracing::error!(error = %e, file = %file.display(), "extract failed");
    })
}

fn run(
    workspace: &Workspace,
    file: &Path,
    options: &ExtractOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    options.validate()?;
    let doc = load_document(file)?;

    progress.start(options.pages.len());
    let mut copier = PageCopier::new(&doc);
    for &page in &options.pages {
        copier.push(page)?;
        progress.tick();
    }
    let mut extracted = copier.finish()?;

    let temp = workspace.temp_path("extracted", ".pdf")?;
    save_document(&mut extracted, &temp)?;
    let output = workspace.commit(&temp, &options.output_file_name)?;
    tracing::info!(file = %file.display(), pages = options.pages.len(), output = %output.display(), "extracted pages");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_pdf::{create_test_pdf, page_label};
    use lopdf::Document;
    use pretty_assertions::assert_eq;

    fn setup(num_pages: u32) -> (tempfile::TempDir, Workspace, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path().join("storage"));
        let path = dir.path().join("input.pdf");
        std::fs::write(&path, create_test_pdf(num_pages)).unwrap();
        (dir, ws, path)
    }

    #[test]
    fn test_extract_keeps_requested_order() {
        let (_dir, ws, path) = setup(5);
        let options = ExtractOptions {
            pages: vec![4, 2],
            output_file_name: "extracted".into(),
        };

        let output = extract_pages(&ws, &path, &options, &mut Progress::silent()).unwrap();
        let doc = Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert_eq!(page_label(&doc, 1), "Page 4");
        assert_eq!(page_label(&doc, 2), "Page 2");
    }

    #[test]
    fn test_extract_supports_repeats() {
        let (_dir, ws, path) = setup(3);
        let options = ExtractOptions {
            pages: vec![1, 1, 3],
            output_file_name: "extracted".into(),
        };

        let output = extract_pages(&ws, &path, &options, &mut Progress::silent()).unwrap();
        let doc = Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        assert_eq!(page_label(&doc, 1), "Page 1");
        assert_eq!(page_label(&doc, 2), "Page 1");
        assert_eq!(page_label(&doc, 3), "Page 3");
    }

    #[test]
    fn test_extract_rejects_out_of_range() {
        let (_dir, ws, path) = setup(3);
        let options = ExtractOptions {
            pages: vec![1, 7],
            output_file_name: "extracted".into(),
        };
        let result = extract_pages(&ws, &path, &options, &mut Progress::silent());
        assert!(matches!(result, Err(PdfDeckError::ValidationError(_))));
        assert!(!ws.root().join("extracted.pdf").exists());
    }

    #[test]
    fn test_extract_rejects_empty_list() {
        let (_dir, ws, path) = setup(3);
        let options = ExtractOptions {
            pages: vec![],
            output_file_name: "extracted".into(),
        };
        let result = extract_pages(&ws, &path, &options, &mut Progress::silent());
        assert!(matches!(result, Err(PdfDeckError::ValidationError(_))));
    }

    #[test]
    fn test_extract_progress_ticks_per_page() {
        let (_dir, ws, path) = setup(4);
        let options = ExtractOptions {
            pages: vec![1, 2, 3, 4],
            output_file_name: "extracted".into(),
        };

        let mut seen = Vec::new();
        {
            let mut progress = Progress::new(|p| seen.push(p));
            extract_pages(&ws, &path, &options, &mut progress).unwrap();
        }
        assert_eq!(seen, vec![25.0, 50.0, 75.0, 100.0]);
    }
}
