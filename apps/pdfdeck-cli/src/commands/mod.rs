//! Subcommand implementations.
//!
//! `pdf` wraps the pdfdeck-core transforms, `ai` the pdfdeck-ai features,
//! and `settings` the stored configuration. Every command prints its
//! result to stdout; progress and logs go to stderr.

use std::path::Path;

pub mod ai;
pub mod pdf;
pub mod settings;

/// Progress callback that rewrites one stderr line and finishes it at 100.
pub(crate) fn render_progress(label: &'static str) -> impl FnMut(f64) {
    move |percent| {
        eprint!("\r{label}: {percent:>3.0}%");
        if percent >= 100.0 {
            eprintln!();
        }
    }
}

/// File stem for default output names.
pub(crate) fn stem(file: &Path) -> &str {
    file.file_stem()
        .and_then(|name| name.to_str())
        .unwrap_or("document")
}

/// File name for chunk labels and messages.
pub(crate) fn display_name(file: &Path) -> &str {
    file.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document")
}
