//! PDF page-set operations and document inspection
//!
//! This crate provides filesystem-backed PDF manipulation using lopdf.
//!
//! Every operation follows the same pipeline: load the document, transform
//! it, save to a workspace temp file, then commit the finished artifact to
//! the permanent directory. Progress is reported per unit of work through a
//! caller-supplied callback.

pub mod document;
pub mod error;
pub mod extract;
pub mod info;
pub mod merge;
pub mod numbering;
pub mod options;
pub mod organize;
pub mod pages;
pub mod progress;
pub mod remove;
pub mod rotate;
pub mod split;
pub mod tools;
pub mod watermark;
pub mod workspace;

mod stamp;

pub use document::{load_document, save_document, SourceFile};
pub use error::PdfDeckError;
pub use extract::extract_pages;
pub use info::{document_info, get_page_count, DocumentInfo, PageDimensions};
pub use merge::merge_pdfs;
pub use numbering::add_page_numbers;
pub use options::{
    ExtractOptions, MergeOptions, NumberPosition, OrganizeOptions, PageNumberOptions, PageRange,
    PageSelection, RemoveOptions, RotateOptions, RotationAngle, SplitOptions, WatermarkOptions,
    WatermarkPosition,
};
pub use organize::organize_pages;
pub use pages::parse_page_list;
pub use progress::{Progress, ProgressStatus};
pub use remove::remove_pages;
pub use rotate::rotate_pages;
pub use split::split_pdf;
pub use tools::{ToolCategory, ToolKind};
pub use watermark::add_watermark;
pub use workspace::{Workspace, DEFAULT_TEMP_MAX_AGE};

/// Human-readable file size like `"1.5 MB"`; trailing zeros are trimmed.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    let exponent = (((bytes as f64).ln() / 1024_f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_file_size_zero() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn test_format_file_size_bytes() {
        assert_eq!(format_file_size(512), "512 Bytes");
    }

    #[test]
    fn test_format_file_size_trims_trailing_zeros() {
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
    }

    #[test]
    fn test_format_file_size_two_decimals() {
        assert_eq!(format_file_size(1234), "1.21 KB");
    }

    #[test]
    fn test_format_file_size_larger_units() {
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5 GB");
        assert_eq!(format_file_size(1024_u64.pow(4)), "1 TB");
    }

    #[test]
    fn test_format_file_size_caps_at_terabytes() {
        assert_eq!(format_file_size(1024_u64.pow(5)), "1024 TB");
    }
}
