//! Directory-to-store synchronization.
//!
//! [`LibraryIndexer`] walks one directory and writes every readable audio file
//! into the store. Ids continue from the largest id already stored and are
//! consumed even when a file's transaction fails, so they are never reused.
//! The loading label shows the title of the file being written and is reset
//! to the sentinel however the run ends.

use crate::app::SharedState;
use crate::domain::{MediaRecord, Result};
use crate::indexer::scanner::scan_directory;
use crate::indexer::tags::TagReader;
use crate::infrastructure::{device_path, file_times};
use crate::storage::{LibraryCounts, LibraryStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings that shape how files map into the store.
#[derive(Debug, Clone)]
pub struct IndexerOptions {
    /// Card root; device paths are relative to it.
    pub library_root: PathBuf,
    /// Drive prefix for device paths (`a:`).
    pub drive_prefix: String,
    /// Leave files whose device path is already stored untouched.
    pub skip_existing: bool,
}

/// Tally of one indexing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub indexed: usize,
    pub skipped_unsupported: usize,
    pub skipped_unreadable: usize,
    pub skipped_existing: usize,
    /// Files whose transaction was rolled back.
    pub failed: usize,
    pub first_id: Option<i64>,
    pub last_id: Option<i64>,
    /// Totals after the run.
    pub counts: LibraryCounts,
}

/// Synchronizes directories into a [`LibraryStore`].
pub struct LibraryIndexer {
    store: Box<dyn LibraryStore>,
    reader: Box<dyn TagReader>,
    shared: Arc<SharedState>,
    options: IndexerOptions,
}

impl LibraryIndexer {
    #[must_use]
    pub fn new(
        store: Box<dyn LibraryStore>,
        reader: Box<dyn TagReader>,
        shared: Arc<SharedState>,
        options: IndexerOptions,
    ) -> Self {
        Self {
            store,
            reader,
            shared,
            options,
        }
    }

    /// Indexes every allow-listed file directly inside `dir`.
    ///
    /// Per-file problems are counted in the report and never abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be scanned, the starting id cannot be
    /// read, or the counters cannot be refreshed. Tracks committed before the
    /// error stay committed.
    pub fn run(&mut self, dir: &Path) -> Result<SyncReport> {
        let _span = tracing::info_span!("index_directory", dir = ?dir).entered();

        let result = self.sync(dir);
        self.shared.clear_label();

        match &result {
            Ok(report) => tracing::info!(
                indexed = report.indexed,
                skipped_unsupported = report.skipped_unsupported,
                skipped_unreadable = report.skipped_unreadable,
                skipped_existing = report.skipped_existing,
                failed = report.failed,
                media = report.counts.media,
                albums = report.counts.albums,
                artists = report.counts.artists,
                "indexing finished"
            ),
            Err(e) => tracing::error!(error = %e, "indexing aborted"),
        }
        result
    }

    fn sync(&mut self, dir: &Path) -> Result<SyncReport> {
        let files = scan_directory(dir)?;
        let mut next_id = self.store.max_media_id()?.unwrap_or(0) + 1;
        let mut report = SyncReport::default();

        tracing::debug!(files = files.len(), next_id, "starting sync");

        for file in files {
            let Some(format) = file.format else {
                tracing::trace!(path = ?file.path, "not an audio file");
                report.skipped_unsupported += 1;
                continue;
            };

            let path = device_path(&self.options.library_root, &file.path, &self.options.drive_prefix);
            if self.options.skip_existing {
                match self.store.contains_path(&path) {
                    Ok(false) => {}
                    Ok(true) => {
                        tracing::debug!(path = %path, "already indexed");
                        report.skipped_existing += 1;
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path, error = %e, "lookup failed");
                        report.failed += 1;
                        continue;
                    }
                }
            }

            let metadata = match std::fs::metadata(&file.path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!(path = ?file.path, error = %e, "cannot stat file");
                    report.skipped_unreadable += 1;
                    continue;
                }
            };
            let mut tags = match self.reader.read(&file.path) {
                Ok(tags) => tags,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable file");
                    report.skipped_unreadable += 1;
                    continue;
                }
            };
            tags.byte_length = metadata.len();
            self.shared.set_label(tags.title.as_str());

            let id = next_id;
            next_id += 1;
            let (created_at, modified_at) = file_times(&metadata);
            let record = MediaRecord::from_tags(id, path, &tags, format, created_at, modified_at);

            match self.store.ingest(&record) {
                Ok(_) => {
                    report.indexed += 1;
                    report.first_id.get_or_insert(id);
                    report.last_id = Some(id);
                }
                Err(e) => {
                    tracing::warn!(id, path = %record.path, error = %e, "track rolled back");
                    report.failed += 1;
                }
            }
        }

        report.counts = self.store.refresh_counts()?;
        Ok(report)
    }
}
