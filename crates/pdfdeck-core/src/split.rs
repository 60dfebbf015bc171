//! PDF split.
//!
//! Produces one output document per inclusive page range, each committed
//! under its own output name.

use std::path::{Path, PathBuf};

use crate::document::{load_document, save_document};
use crate::error::PdfDeckError;
use crate::options::SplitOptions;
use crate::pages::copy_pages;
use crate::progress::Progress;
use crate::workspace::Workspace;

/// Split `file` into one document per range. Progress ticks once per range.
pub fn split_pdf(
    workspace: &Workspace,
    file: &Path,
    options: &SplitOptions,
    progress: &mut Progress<'_>,
) -> Result<Vec<PathBuf>, PdfDeckError> {
    run(workspace, file, options, progress).inspect_err(|e| {
        tracing::error!(error = %e, file = %file.display(), "split failed");
    })
}

fn run(
    workspace: &Workspace,
    file: &Path,
    options: &SplitOptions,
    progress: &mut Progress<'_>,
) -> Result<Vec<PathBuf>, PdfDeckError> {
    options.validate()?;
    let doc = load_document(file)?;
    let page_count = doc.get_pages().len() as u32;
    for range in &options.ranges {
        if range.end > page_count {
            return Err(PdfDeckError::ValidationError(format!(
                "Page {} does not exist (document has {} pages)",
                range.end, page_count
            )));
        }
    }

    progress.start(options.ranges.len());
    let mut outputs = Vec::with_capacity(options.ranges.len());
    for (i, (range, name)) in options
        .ranges
        .iter()
        .zip(&options.output_file_names)
        .enumerate()
    {
        let pages: Vec<u32> = range.pages().collect();
        let mut part = copy_pages(&doc, &pages)?;
        let temp = workspace.temp_path(&format!("split_{}", i), ".pdf")?;
        save_document(&mut part, &temp)?;
        outputs.push(workspace.commit(&temp, name)?);
        progress.tick();
    }

    tracing::info!(file = %file.display(), parts = outputs.len(), "split PDF");
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PageRange;
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

    fn options(ranges: Vec<PageRange>) -> SplitOptions {
        let output_file_names = (0..ranges.len()).map(|i| format!("part_{}", i)).collect();
        SplitOptions {
            ranges,
            output_file_names,
        }
    }

    #[test]
    fn test_split_produces_expected_page_counts() {
        let (_dir, ws, path) = setup(10);
        let options = options(vec![
            PageRange::new(1, 3),
            PageRange::new(4, 4),
            PageRange::new(5, 10),
        ]);

        let outputs = split_pdf(&ws, &path, &options, &mut Progress::silent()).unwrap();
        assert_eq!(outputs.len(), 3);

        let counts: Vec<usize> = outputs
            .iter()
            .map(|p| Document::load(p).unwrap().get_pages().len())
            .collect();
        assert_eq!(counts, vec![3, 1, 6]);
    }

    #[test]
    fn test_split_keeps_pages_in_order() {
        let (_dir, ws, path) = setup(6);
        let options = options(vec![PageRange::new(2, 4)]);

        let outputs = split_pdf(&ws, &path, &options, &mut Progress::silent()).unwrap();
        let doc = Document::load(&outputs[0]).unwrap();
        assert_eq!(page_label(&doc, 1), "Page 2");
        assert_eq!(page_label(&doc, 2), "Page 3");
        assert_eq!(page_label(&doc, 3), "Page 4");
    }

    #[test]
    fn test_split_rejects_range_past_end() {
        let (_dir, ws, path) = setup(5);
        let options = options(vec![PageRange::new(4, 9)]);
        let result = split_pdf(&ws, &path, &options, &mut Progress::silent());
        assert!(matches!(result, Err(PdfDeckError::ValidationError(_))));
    }

    #[test]
    fn test_split_rejects_name_count_mismatch() {
        let (_dir, ws, path) = setup(5);
        let options = SplitOptions {
            ranges: vec![PageRange::new(1, 2), PageRange::new(3, 4)],
            output_file_names: vec!["only".into()],
        };
        let result = split_pdf(&ws, &path, &options, &mut Progress::silent());
        assert!(matches!(result, Err(PdfDeckError::ValidationError(_))));
    }

    #[test]
    fn test_split_progress_ticks_per_range() {
        let (_dir, ws, path) = setup(4);
        let options = options(vec![PageRange::new(1, 2), PageRange::new(3, 4)]);

        let mut seen = Vec::new();
        {
            let mut progress = Progress::new(|p| seen.push(p));
            split_pdf(&ws, &path, &options, &mut progress).unwrap();
        }
        assert_eq!(seen, vec![50.0, 100.0]);
    }
}
