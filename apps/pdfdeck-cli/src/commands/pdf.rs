//! Page-set transform subcommands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pdfdeck_core::{
    add_page_numbers, add_watermark, document_info, extract_pages, format_file_size,
    get_page_count, merge_pdfs, organize_pages, parse_page_list, remove_pages, rotate_pages,
    split_pdf, ExtractOptions, MergeOptions, NumberPosition, OrganizeOptions, PageNumberOptions,
    PageRange, PageSelection, Progress, RemoveOptions, RotateOptions, RotationAngle, SplitOptions,
    ToolCategory, ToolKind, WatermarkOptions, WatermarkPosition,
};

use crate::commands::{render_progress, stem};
use crate::state::AppState;

pub fn merge(state: &AppState, files: &[PathBuf], output: String) -> Result<()> {
    let options = MergeOptions {
        output_file_name: output,
    };
    let mut progress = Progress::new(render_progress("Merging"));
    let path = merge_pdfs(&state.workspace, files, &options, &mut progress)?;
    println!("{}", path.display());
    Ok(())
}

pub fn split(
    state: &AppState,
    file: &Path,
    ranges: Vec<PageRange>,
    outputs: Vec<String>,
) -> Result<()> {
    let output_file_names = if outputs.is_empty() {
        (1..=ranges.len())
            .map(|i| format!("{}_part_{}", stem(file), i))
            .collect()
    } else {
        outputs
    };
    let options = SplitOptions {
        ranges,
        output_file_names,
    };
    let mut progress = Progress::new(render_progress("Splitting"));
    let paths = split_pdf(&state.workspace, file, &options, &mut progress)?;
    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}

pub fn extract(state: &AppState, file: &Path, pages: &str, output: Option<String>) -> Result<()> {
    let options = ExtractOptions {
        pages: parse_page_list(pages)?,
        output_file_name: output.unwrap_or_else(|| format!("{}_extracted", stem(file))),
    };
    let mut progress = Progress::new(render_progress("Extracting"));
    let path = extract_pages(&state.workspace, file, &options, &mut progress)?;
    println!("{}", path.display());
    Ok(())
}

pub fn remove(state: &AppState, file: &Path, pages: &str, output: Option<String>) -> Result<()> {
    let options = RemoveOptions {
        pages: parse_page_list(pages)?,
        output_file_name: output.unwrap_or_else(|| format!("{}_removed", stem(file))),
    };
    let mut progress = Progress::new(render_progress("Removing"));
    let path = remove_pages(&state.workspace, file, &options, &mut progress)?;
    println!("{}", path.display());
    Ok(())
}

pub fn organize(
    state: &AppState,
    file: &Path,
    order: &str,
    rotations: &[String],
    output: Option<String>,
) -> Result<()> {
    let options = OrganizeOptions {
        page_order: parse_order(order)?,
        rotations: parse_rotation_map(rotations)?,
        output_file_name: output.unwrap_or_else(|| format!("{}_organized", stem(file))),
    };
    let mut progress = Progress::new(render_progress("Organizing"));
    let path = organize_pages(&state.workspace, file, &options, &mut progress)?;
    println!("{}", path.display());
    Ok(())
}

pub fn rotate(
    state: &AppState,
    file: &Path,
    pages: &str,
    angle: RotationAngle,
    output: Option<String>,
) -> Result<()> {
    let selection: PageSelection = pages.parse()?;
    let options = RotateOptions {
        pages: selection.resolve(get_page_count(file)?)?,
        degrees: angle,
        output_file_name: output.unwrap_or_else(|| format!("{}_rotated", stem(file))),
    };
    let mut progress = Progress::new(render_progress("Rotating"));
    let path = rotate_pages(&state.workspace, file, &options, &mut progress)?;
    println!("{}", path.display());
    Ok(())
}

pub fn page_numbers(
    state: &AppState,
    file: &Path,
    format: String,
    position: NumberPosition,
    start: u32,
    output: Option<String>,
) -> Result<()> {
    let options = PageNumberOptions {
        position,
        start_number: start,
        format,
        output_file_name: output.unwrap_or_else(|| format!("{}_numbered", stem(file))),
    };
    let mut progress = Progress::new(render_progress("Numbering"));
    let path = add_page_numbers(&state.workspace, file, &options, &mut progress)?;
    println!("{}", path.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn watermark(
    state: &AppState,
    file: &Path,
    text: String,
    opacity: f64,
    position: WatermarkPosition,
    rotation: f64,
    pages: &str,
    output: Option<String>,
) -> Result<()> {
    let options = WatermarkOptions {
        text: Some(text),
        image_path: None,
        opacity,
        position,
        rotation,
        pages: pages.parse()?,
        output_file_name: output.unwrap_or_else(|| format!("{}_watermarked", stem(file))),
    };
    let mut progress = Progress::new(render_progress("Watermarking"));
    let path = add_watermark(&state.workspace, file, &options, &mut progress)?;
    println!("{}", path.display());
    Ok(())
}

pub fn info(file: &Path, json: bool) -> Result<()> {
    let info = document_info(file)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}  ({})", info.file.name, format_file_size(info.file.size));
    println!("Pages:     {}", info.page_count);
    println!("Encrypted: {}", if info.encrypted { "yes" } else { "no" });
    for page in &info.pages {
        println!(
            "  page {:>3}  {:.0} x {:.0} pt",
            page.number, page.width, page.height
        );
    }
    Ok(())
}

pub fn tools() -> Result<()> {
    for category in [
        ToolCategory::Organization,
        ToolCategory::Editing,
        ToolCategory::Ai,
    ] {
        println!("{}", category.title());
        for tool in ToolKind::ALL.iter().filter(|t| t.category() == category) {
            println!("  {:<20} {}", tool.slug(), tool.description());
        }
        println!();
    }
    Ok(())
}

/// Parse an organize order list: comma-separated page numbers, order kept.
fn parse_order(s: &str) -> Result<Vec<u32>> {
    s.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u32>()
                .with_context(|| format!("invalid page number: {part}"))
        })
        .collect()
}

/// Parse repeated `PAGE:ANGLE` rotation specs into a rotation map.
fn parse_rotation_map(specs: &[String]) -> Result<BTreeMap<u32, RotationAngle>> {
    let mut rotations = BTreeMap::new();
    for spec in specs {
        let (page, angle) = spec
            .split_once(':')
            .with_context(|| format!("invalid rotation (expected PAGE:ANGLE): {spec}"))?;
        let page: u32 = page
            .trim()
            .parse()
            .with_context(|| format!("invalid page number: {}", page.trim()))?;
        let angle: RotationAngle = angle.trim().parse()?;
        rotations.insert(page, angle);
    }
    Ok(rotations)
}
