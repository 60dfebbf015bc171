//! Page rotation.
//!
//! Sets the absolute `/Rotate` value on the listed pages of the loaded
//! document. No pages are copied; the rest of the document is untouched.

use std::path::{Path, PathBuf};

use crate::document::{load_document, save_document};
use crate::error::PdfDeckError;
use crate::options::RotateOptions;
use crate::pages::{set_page_rotation, validate_page_numbers};
use crate::progress::Progress;
use crate::workspace::Workspace;

/// Rotate the listed pages of `file`. Progress ticks once per listed page.
pub fn rotate_pages(
    workspace: &Workspace,
    file: &Path,
    options: &RotateOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    run(workspace, file, options, progress).inspect_err(|e| {
        tracing::error!(error = %e, file = %file.display(), "rotate failed");
    })
}

fn run(
    workspace: &Workspace,
    file: &Path,
    options: &RotateOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    options.validate()?;
    let mut doc = load_document(file)?;
    let page_map = doc.get_pages();
    validate_page_numbers(&options.pages, page_map.len() as u32)?;

    progress.start(options.pages.len());
    let degrees = options.degrees.degrees();
    for &page in &options.pages {
        let page_id = page_map.get(&page).copied().ok_or_else(|| {
            PdfDeckError::OperationError(format!("Page {} not found in page tree", page))
        })?;
        set_page_rotation(&mut doc, page_id, degrees)?;
        progress.tick();
    }

    let temp = workspace.temp_path("rotated", ".pdf")?;
    save_document(&mut doc, &temp)?;
    let output = workspace.commit(&temp, &options.output_file_name)?;
    tracing::info!(file = %file.display(), pages = options.pages.len(), degrees, "rotated pages");
    Ok(output)
}
