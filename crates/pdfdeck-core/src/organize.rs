//! Page reorganization.
//!
//! Rebuilds the document in an explicit page order (entries may repeat or
//! omit pages) and applies a per-original-page rotation map to the copies.

use std::path::{Path, PathBuf};

use crate::document::{load_document, save_document};
use crate::error::PdfDeckError;
use crate::options::OrganizeOptions;
use crate::pages::PageCopier;
use crate::progress::Progress;
use crate::workspace::Workspace;

/// Reorder and rotate the pages of `file`. Progress ticks once per page of
/// the new sequence.
pub fn organize_pages(
    workspace: &Workspace,
    file: &Path,
    options: &OrganizeOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    run(workspace, file, options, progress).inspect_err(|e| {
        tracing::error!(error = %e, file = %file.display(), "organize failed");
    })
}

fn run(
    workspace: &Workspace,
    file: &Path,
    options: &OrganizeOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    options.validate()?;
    let doc = load_document(file)?;

    progress.start(options.page_order.len());
    let mut copier = PageCopier::new(&doc);
    for &page in &options.page_order {
        copier.push(page)?;
        if let Some(angle) = options.rotations.get(&page) {
            copier.rotate_last(angle.degrees())?;
        }
        progress.tick();
    }
    let mut organized = copier.finish()?;

    let temp = workspace.temp_path("organized", ".pdf")?;
    save_document(&mut organized, &temp)?;
    let output = workspace.commit(&temp, &options.output_file_name)?;
    tracing::info!(file = %file.display(), pages = options.page_order.len(), "organized pages");
    Ok(output)
}
