//! Page removal.
//!
//! Copies the complement of the removal set, original order preserved.

use std::path::{Path, PathBuf};

use crate::document::{load_document, save_document};
use crate::error::PdfDeckError;
use crate::options::RemoveOptions;
use crate::pages::{complement, validate_page_numbers, PageCopier};
use crate::progress::Progress;
use crate::workspace::Workspace;

/// Remove the listed pages of `file`. Progress ticks once per surviving page.
pub fn remove_pages(
    workspace: &Workspace,
    file: &Path,
    options: &RemoveOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    run(workspace, file, options, progress).inspect_err(|e| {
        tracing::error!(error = %e, file = %file.display(), "remove failed");
    })
}

fn run(
    workspace: &Workspace,
    file: &Path,
    options: &RemoveOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    options.validate()?;
    let doc = load_document(file)?;
    let page_count = doc.get_pages().len() as u32;
    validate_page_numbers(&options.pages, page_count)?;

    let kept = complement(&options.pages, page_count);
    if kept.is_empty() {
        return Err(PdfDeckError::ValidationError(
            "Cannot remove every page of the document".into(),
        ));
    }

    progress.start(kept.len());
    let mut copier = PageCopier::new(&doc);
    for &page in &kept {
        copier.push(page)?;
        progress.tick();
    }
    let mut remaining = copier.finish()?;

    let temp = workspace.temp_path("removed", ".pdf")?;
    save_document(&mut remaining, &temp)?;
    let output = workspace.commit(&temp, &options.output_file_name)?;
    tracing::info!(file = %file.display(), removed = options.pages.len(), kept = kept.len(), "removed pages");
    Ok(output)
}
