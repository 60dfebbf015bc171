//! Stamp a watermark across selected pages of a document.

use std::path::{Path, PathBuf};

use crate::document::{load_document, save_document};
use crate::error::PdfDeckError;
use crate::options::{WatermarkOptions, WatermarkPosition};
use crate::progress::Progress;
use crate::stamp::{
    add_opacity_gstate, add_standard_font, append_content, page_size, register_font,
    register_gstate, stamp_content, text_width, StandardFont, TextStamp,
};
use crate::workspace::Workspace;

const FONT_SIZE: f64 = 36.0;
const MARGIN: f64 = 30.0;

/// Stamp the watermark text on the selected pages and return the committed
/// output path.
///
/// The text draws in Helvetica-Bold at the configured opacity and rotation.
/// Image watermarks are not supported.
pub fn add_watermark(
    workspace: &Workspace,
    input: &Path,
    options: &WatermarkOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    run(workspace, input, options, progress)
        .inspect_err(|e| tracing::error!(error = %e, "watermark failed"))
}

fn run(
    workspace: &Workspace,
    input: &Path,
    options: &WatermarkOptions,
    progress: &mut Progress<'_>,
) -> Result<PathBuf, PdfDeckError> {
    options.validate()?;
    if options.image_path.is_some() {
        return Err(PdfDeckError::Unsupported(
            "Image watermarks are not implemented yet".into(),
        ));
    }
    let text = options.text.as_deref().ok_or_else(|| {
        PdfDeckError::ValidationError("Watermark requires text or an image".into())
    })?;

    let mut doc = load_document(input)?;
    let page_map = doc.get_pages();
    let page_count = page_map.len() as u32;
    let targets = options.pages.resolve(page_count)?;

    let font_id = add_standard_font(&mut doc, StandardFont::HelveticaBold);
    let gs_id = add_opacity_gstate(&mut doc, options.opacity);

    progress.start(targets.len());
    for page in &targets {
        let page_id = *page_map.get(page).ok_or_else(|| {
            PdfDeckError::ValidationError(format!(
                "Page {} does not exist (document has {} pages)",
                page, page_count
            ))
        })?;
        let (width, height) = page_size(&doc, page_id);
        let mark_width = text_width(StandardFont::HelveticaBold, text, FONT_SIZE);
        let (x, y) = anchor(options.position, width, height, mark_width);

        register_font(&mut doc, page_id, StandardFont::HelveticaBold, font_id)?;
        register_gstate(&mut doc, page_id, gs_id)?;
        let content = stamp_content(&TextStamp {
            font: StandardFont::HelveticaBold,
            size: FONT_SIZE,
            text,
            x,
            y,
            rotation: options.rotation,
            use_opacity: true,
        });
        append_content(&mut doc, page_id, content)?;
        progress.tick();
    }

    let temp = workspace.temp_path("watermarked", ".pdf")?;
    save_document(&mut doc, &temp)?;
    let destination = workspace.commit(&temp, &options.output_file_name)?;
    tracing::info!(
        output = %destination.display(),
        pages = targets.len(),
        "added watermark"
    );
    Ok(destination)
}

/// Baseline origin for the watermark on a `width` by `height` page.
fn anchor(position: WatermarkPosition, width: f64, height: f64, mark_width: f64) -> (f64, f64) {
    match position {
        WatermarkPosition::Center => ((width - mark_width) / 2.0, height / 2.0),
        WatermarkPosition::TopLeft => (MARGIN, height - MARGIN),
        WatermarkPosition::TopRight => (width - mark_width - MARGIN, height - MARGIN),
        WatermarkPosition::BottomLeft => (MARGIN, MARGIN),
        WatermarkPosition::BottomRight => (width - mark_width - MARGIN, MARGIN),
    }
}
