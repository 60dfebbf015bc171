//! Stamp page-number labels onto a document.

use std::path::{Path, PathBuf};

use crate::document::{load_document, save_document};
use crate::error::PdfDeckError;
use crate::options::{NumberPosition, PageNumberOptions};
use crate::progress::Progress;
use crate::stamp::{
    add_standard_font, append_content, page_size, register_font, stamp_content, text_width,
    StandardFont, TextStamp,
};
use crate::workspace::Workspace;

const FONT_SIZE: f64 = 12.0;
const MARGIN: f64 = 30.0;

/// Stamp a label on every page, numbering upward from
/// `options.start_number`.
///
/// The template replaces `{n}` with the page's assigned number and
/// `{total}` with the page count. Returns the committed output path.
pub fn add_page_numbers(
    workspace: &Workspace,
    input: &Path,
    options: &PageNumberOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    run(workspace, input, options, progress)
        .inspect_err(|e| tracing::error!(error = %e, "page numbering failed"))
}

fn run(
    workspace: &Workspace,
    input: &Path,
    options: &PageNumberOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    options.validate()?;

    let mut doc = load_document(input)?;
    let pages = doc.get_pages();
    let page_count = pages.len() as u32;
    let font_id = add_standard_font(&mut doc, StandardFont::Helvetica);

    progress.start(pages.len());
    for (i, page_id) in pages.values().enumerate() {
        let label = options
            .format
            .replace("{n}", &(options.start_number + i as u32).to_string())
            .replace("{total}", &page_count.to_string());
        let (width, height) = page_size(&doc, *page_id);
        let label_width = text_width(StandardFont::Helvetica, &label, FONT_SIZE);
        let (x, y) = anchor(options.position, width, height, label_width);

        register_font(&mut doc, *page_id, StandardFont::Helvetica, font_id)?;
        let content = stamp_content(&TextStamp {
            font: StandardFont::Helvetica,
            size: FONT_SIZE,
            text: &label,
            x,
            y,
            rotation: 0.0,
            use_opacity: false,
        });
        append_content(&mut doc, *page_id, content)?;
        progress.tick();
    }

    let temp = workspace.temp_path("page_numbers", ".pdf")?;
    save_document(&mut doc, &temp)?;
    let destination = workspace.commit(&temp, &options.output_file_name)?;
    tracing::info!(output = %destination.display(), pages = page_count, "added page numbers");
    Ok(destination)
}

/// Baseline origin for a label on a `width` by `height` page.
fn anchor(position: NumberPosition, width: f64, height: f64, label_width: f64) -> (f64, f64) {
    let x = match position {
        NumberPosition::TopLeft | NumberPosition::BottomLeft => MARGIN,
        NumberPosition::TopCenter | NumberPosition::BottomCenter => (width - label_width) / 2.0,
        NumberPosition::TopRight | NumberPosition::BottomRight => width - label_width - MARGIN,
    };
    let y = match position {
        NumberPosition::TopLeft | NumberPosition::TopCenter | NumberPosition::TopRight => {
            height - MARGIN
        }
        _ => MARGIN,
    };
    (x, y)
}
