//! Directory scanning for the indexer.
//!
//! Only the chosen directory itself is scanned; subdirectories are not entered.
//! Files come back sorted by name so ids are assigned in a stable order.

use crate::domain::{AudioFormat, Result, TagsyncError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One regular file found in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// `None` when the extension is not on the allow-list.
    pub format: Option<AudioFormat>,
}

impl ScannedFile {
    fn new(path: PathBuf) -> Self {
        let format = AudioFormat::from_path(&path);
        Self { path, format }
    }
}

/// Lists the regular files directly inside `dir`.
///
/// # Errors
///
/// Returns [`TagsyncError::Scan`] if `dir` cannot be read. Entries that vanish
/// or fail to stat mid-scan are dropped with a debug log.
pub fn scan_directory(dir: &Path) -> Result<Vec<ScannedFile>> {
    let _span = tracing::debug_span!("scan_directory", dir = ?dir).entered();

    std::fs::read_dir(dir).map_err(|e| TagsyncError::scan(dir, e))?;

    let files: Vec<ScannedFile> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| ScannedFile::new(entry.into_path()))
        .collect();

    tracing::debug!(
        files = files.len(),
        audio = files.iter().filter(|f| f.format.is_some()).count(),
        "directory scanned"
    );
    Ok(files)
}
