//! App storage layout and temp-file lifecycle.
//!
//! Operations write to a reserved path under `temp/` and promote the result
//! into the storage root with [`Workspace::commit`]. Anything stranded in
//! `temp/` by a crash or an aborted operation is reclaimed by
//! [`Workspace::sweep_expired`], which the app runs at startup.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

use crate::error::PdfDeckError;

/// Temp files older than this are eligible for deletion by the sweep.
pub const DEFAULT_TEMP_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Filesystem context for one storage root.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    temp_dir: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let temp_dir = root.join("temp");
        Workspace { root, temp_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Create the storage root and temp dir if they do not exist yet.
    pub fn ensure_dirs(&self) -> Result<(), PdfDeckError> {
        fs::create_dir_all(&self.temp_dir).map_err(|e| {
            PdfDeckError::SaveError(format!("Failed to create {}: {}", self.temp_dir.display(), e))
        })
    }

    /// Reserve a fresh temp path: `<temp>/<prefix>_<millis>_<random8><ext>`.
    ///
    /// The file itself is not created. `extension` includes the dot.
    pub fn temp_path(&self, prefix: &str, extension: &str) -> Result<PathBuf, PdfDeckError> {
        self.ensure_dirs()?;
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        let name = format!(
            "{}_{}_{}{}",
            prefix,
            Utc::now().timestamp_millis(),
            suffix,
            extension
        );
        Ok(self.temp_dir.join(name))
    }

    /// Delete temp files whose mtime age exceeds `max_age`.
    ///
    /// Best-effort housekeeping: a missing temp dir is a no-op, unreadable
    /// or undeletable entries are logged and skipped, and the sweep itself
    /// never fails. Returns the number of files deleted.
    pub fn sweep_expired(&self, max_age: Duration) -> usize {
        let entries = match fs::read_dir(&self.temp_dir) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };
        let mut deleted = 0;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable temp entry");
                    continue;
                }
            };
            let path = entry.path();
            let age = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(|mtime| mtime.elapsed().unwrap_or_default());
            match age {
                Ok(age) if age > max_age => match fs::remove_file(&path) {
                    Ok(()) => deleted += 1,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to delete expired temp file");
                    }
                },
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to stat temp file");
                }
            }
        }
        if deleted > 0 {
            tracing::info!(deleted, "swept expired temp files");
        }
        deleted
    }

    /// Promote a finished temp artifact to `<root>/<output_name>`.
    ///
    /// `output_name` gets a `.pdf` extension appended unless it already ends
    /// with one. The temp file is deleted afterwards (best-effort). Returns
    /// the final path.
    pub fn commit(&self, temp: &Path, output_name: &str) -> Result<PathBuf, PdfDeckError> {
        self.ensure_dirs()?;
        let file_name = if output_name.ends_with(".pdf") {
            output_name.to_string()
        } else {
            format!("{}.pdf", output_name)
        };
        let dest = self.root.join(file_name);
        fs::copy(temp, &dest).map_err(|e| {
            PdfDeckError::SaveError(format!(
                "Failed to copy {} to {}: {}",
                temp.display(),
                dest.display(),
                e
            ))
        })?;
        self.discard(temp);
        Ok(dest)
    }

    /// Best-effort removal of a temp artifact. A missing file is fine.
    pub fn discard(&self, temp: &Path) {
        if let Err(e) = fs::remove_file(temp) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %temp.display(), error = %e, "failed to delete temp file");
            }
        }
    }
}
