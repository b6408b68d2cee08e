//! Storage backend abstraction.
//!
//! This module defines the [`LibraryStore`] trait the indexer writes through.
//! The trait mirrors what one indexing run needs from the player database and
//! nothing more: where to continue numbering, whether a file is already known,
//! how to ingest one track, and how to refresh the derived totals.

use crate::domain::{MediaRecord, Result};
use crate::storage::models::{IngestOutcome, LibraryCounts};

/// Abstraction over the player's media database.
///
/// The indexer owns its store exclusively for the duration of a run, so
/// implementations need to be `Send` but not `Sync`.
///
/// # Implementations
///
/// - [`SqliteStore`](crate::storage::SqliteStore): the on-device SQLite file
///
/// # Examples
///
/// ```no_run
/// use tagsync::storage::{LibraryStore, SqliteStore};
///
/// let store = SqliteStore::open("/data/usrlocal_media.db")?;
/// let next = store.max_media_id()?.unwrap_or(0) + 1;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait LibraryStore: Send {
    /// Largest media id currently stored, or `None` for an empty library.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn max_media_id(&self) -> Result<Option<i64>>;

    /// Whether a track with this device path is already in the primary media table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn contains_path(&self, path: &str) -> Result<bool>;

    /// Writes one track atomically.
    ///
    /// Inserts the media row into both media tables, updates or creates its
    /// album and artist aggregates in both mirrors, and appends its id to the
    /// modification log. Either all of it lands or none of it does.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; the store is left unchanged.
    fn ingest(&mut self, record: &MediaRecord) -> Result<IngestOutcome>;

    /// Recomputes the media, album and artist totals and returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn refresh_counts(&mut self) -> Result<LibraryCounts>;
}
