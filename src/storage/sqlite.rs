//! SQLite storage backend.
//!
//! Writes into the player's own database file. Every track is ingested inside
//! its own transaction, so an interrupted run leaves whole tracks behind and
//! never a media row without its aggregates.
//!
//! # Performance Characteristics
//!
//! - **Ingest**: a handful of cached statements per track
//! - **New album**: full rebuild of both album tables (O(albums))
//! - **Best for**: card-sized libraries of a few thousand tracks

use crate::domain::{first_initial, MediaRecord, Result};
use crate::storage::backend::LibraryStore;
use crate::storage::models::{
    AggregateRecord, IngestOutcome, LibraryCounts, Mirror, MirrorDivergence,
};
use crate::storage::schema::{self, BITS_PER_SAMPLE};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Transaction};
use std::path::Path;
use std::time::Duration;

/// How long a statement waits for the player to release its lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite store over the player's media database.
///
/// # Thread Safety
///
/// `Send` but not `Sync`: the connection moves to whichever thread runs the
/// indexer and stays there for the run.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens an existing player database for writing.
    ///
    /// The file must already exist; the player owns its creation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be opened read-write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "opening media database");
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::from_connection(conn)
    }

    /// Opens or creates a database and provisions the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or the schema cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "creating media database");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        schema::provision(&conn)?;
        Self::from_connection(conn)
    }

    /// Provisioned in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::provision(&conn)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self { conn })
    }

    /// All media rows of one mirror, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn media(&self, mirror: Mirror) -> Result<Vec<MediaRecord>> {
        let sql = format!(
            "SELECT id, path, title, album, artist, year, disc_number, track_number,
                    byte_size, sample_rate, bitrate, channel_count, format_code,
                    created_at, modified_at
             FROM {} ORDER BY id",
            schema::media_table(mirror)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(MediaRecord {
                id: row.get(0)?,
                path: row.get(1)?,
                title: row.get(2)?,
                album: row.get(3)?,
                artist: row.get(4)?,
                year: row.get(5)?,
                disc_number: row.get(6)?,
                track_number: row.get(7)?,
                byte_size: row.get(8)?,
                sample_rate: row.get(9)?,
                bitrate: row.get(10)?,
                channel_count: row.get(11)?,
                format_code: row.get(12)?,
                created_at: row.get(13)?,
                modified_at: row.get(14)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Album rows of one mirror in physical (rowid) order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn albums(&self, mirror: Mirror) -> Result<Vec<AggregateRecord>> {
        self.aggregates(schema::album_table(mirror), "album")
    }

    /// Artist rows of one mirror in physical (rowid) order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn artists(&self, mirror: Mirror) -> Result<Vec<AggregateRecord>> {
        self.aggregates(schema::artist_table(mirror), "artist")
    }

    fn aggregates(&self, table: &str, name_column: &str) -> Result<Vec<AggregateRecord>> {
        let sql = format!(
            "SELECT id, {name_column}, cn, created_at, modified_at FROM {table} ORDER BY rowid"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(AggregateRecord {
                representative_id: row.get(0)?,
                name: row.get(1)?,
                track_count: row.get(2)?,
                created_at: row.get(3)?,
                modified_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Ids in the modification log, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn modification_log(&self) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare("SELECT id FROM MTIME_TABLE ORDER BY rowid")?;
        let ids = stmt.query_map([], |row| row.get(0))?;
        Ok(ids.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Totals as last written to `COUNT_TABLE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn counts(&self) -> Result<LibraryCounts> {
        read_counts(&self.conn)
    }

    /// Compares every mirrored table pair and reports the ones that differ.
    ///
    /// # Errors
    ///
    /// Returns an error if a table is missing or the comparison fails.
    pub fn verify_mirrors(&self) -> Result<Vec<MirrorDivergence>> {
        let _span = tracing::debug_span!("sqlite_verify_mirrors").entered();

        let pairs = [
            (schema::MEDIA_TABLE, schema::MEDIA2_TABLE),
            (schema::ALBUM_TABLE, schema::ALBUM2_TABLE),
            (schema::ARTIST_TABLE, schema::ARTIST2_TABLE),
        ];
        let mut divergent = Vec::new();
        for (primary, secondary) in pairs {
            let sql = format!(
                "SELECT
                    (SELECT COUNT(*) FROM (SELECT * FROM {primary} EXCEPT SELECT * FROM {secondary})),
                    (SELECT COUNT(*) FROM (SELECT * FROM {secondary} EXCEPT SELECT * FROM {primary}))"
            );
            let (missing_in_secondary, missing_in_primary): (i64, i64) =
                self.conn.query_row(&sql, [], |row| Ok((row.get(0)?, row.get(1)?)))?;
            if missing_in_secondary != 0 || missing_in_primary != 0 {
                divergent.push(MirrorDivergence {
                    primary,
                    secondary,
                    missing_in_secondary,
                    missing_in_primary,
                });
            }
        }

        tracing::debug!(divergent = divergent.len(), "mirror check complete");
        Ok(divergent)
    }
}

impl LibraryStore for SqliteStore {
    fn max_media_id(&self) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(schema::SELECT_MAX_MEDIA_ID, [], |row| row.get::<_, Option<i64>>(0))?;
        Ok(id)
    }

    fn contains_path(&self, path: &str) -> Result<bool> {
        let found = self
            .conn
            .prepare_cached(schema::SELECT_MEDIA_BY_PATH)?
            .query_row([path], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn ingest(&mut self, record: &MediaRecord) -> Result<IngestOutcome> {
        let _span = tracing::debug_span!("sqlite_ingest",
            id = record.id,
            path = %record.path
        ).entered();

        let tx = self.conn.transaction()?;
        for mirror in Mirror::BOTH {
            insert_media(&tx, mirror, record)?;
        }
        let new_album = upsert_album(&tx, record)?;
        let new_artist = upsert_artist(&tx, record)?;
        tx.prepare_cached(schema::INSERT_MTIME)?.execute([record.id])?;
        tx.commit()?;

        tracing::debug!(new_album, new_artist, "track ingested");
        Ok(IngestOutcome {
            new_album,
            new_artist,
        })
    }

    fn refresh_counts(&mut self) -> Result<LibraryCounts> {
        let _span = tracing::debug_span!("sqlite_refresh_counts").entered();

        self.conn.execute_batch(schema::UPDATE_COUNTS)?;
        let counts = read_counts(&self.conn)?;

        tracing::debug!(
            media = counts.media,
            albums = counts.albums,
            artists = counts.artists,
            "counts refreshed"
        );
        Ok(counts)
    }
}

fn insert_media(tx: &Transaction<'_>, mirror: Mirror, record: &MediaRecord) -> Result<()> {
    tx.prepare_cached(&schema::insert_media(mirror))?.execute(params![
        record.id,
        record.path,
        record.title,
        record.album,
        record.artist,
        record.year,
        record.disc_number,
        record.track_number,
        record.initial(),
        record.byte_size,
        record.sample_rate,
        record.bitrate,
        BITS_PER_SAMPLE,
        record.channel_count,
        record.format_code,
        record.created_at,
        record.modified_at,
        record.title,
    ])?;
    Ok(())
}

/// Bumps an existing album in both tables, or inserts it and re-sorts.
///
/// Returns `true` when the album was new.
fn upsert_album(tx: &Transaction<'_>, record: &MediaRecord) -> Result<bool> {
    let current: Option<i64> = tx
        .prepare_cached(schema::SELECT_ALBUM_COUNT)?
        .query_row([&record.album], |row| row.get(0))
        .optional()?;

    if let Some(count) = current {
        for mirror in Mirror::BOTH {
            tx.prepare_cached(&schema::update_album_count(mirror))?
                .execute(params![count + 1, record.album])?;
        }
        return Ok(false);
    }

    tx.execute(
        schema::INSERT_ALBUM,
        params![
            record.id,
            record.album,
            first_initial(&record.album),
            record.created_at,
            record.modified_at,
            record.album,
        ],
    )?;
    tx.execute_batch(schema::REBUILD_ALBUMS_SORTED)?;
    Ok(true)
}

/// Bumps an existing artist in both tables, or inserts it into both.
///
/// Returns `true` when the artist was new.
fn upsert_artist(tx: &Transaction<'_>, record: &MediaRecord) -> Result<bool> {
    let current: Option<i64> = tx
        .prepare_cached(schema::SELECT_ARTIST_COUNT)?
        .query_row([&record.artist], |row| row.get(0))
        .optional()?;

    if let Some(count) = current {
        for mirror in Mirror::BOTH {
            tx.prepare_cached(&schema::update_artist_count(mirror))?
                .execute(params![count + 1, record.artist])?;
        }
        return Ok(false);
    }

    for mirror in Mirror::BOTH {
        tx.prepare_cached(&schema::insert_artist(mirror))?.execute(params![
            record.id,
            record.artist,
            first_initial(&record.artist),
            record.created_at,
            record.modified_at,
            record.artist,
        ])?;
    }
    Ok(true)
}

fn read_counts(conn: &Connection) -> Result<LibraryCounts> {
    let mut stmt = conn.prepare_cached(schema::SELECT_COUNTS)?;
    let values = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(LibraryCounts {
        media: values.first().copied().unwrap_or_default(),
        albums: values.get(1).copied().unwrap_or_default(),
        artists: values.get(2).copied().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: i64, title: &str, album: &str, artist: &str) -> MediaRecord {
        MediaRecord {
            id,
            path: format!("a:\\Music\\{title}.flac"),
            title: title.to_string(),
            album: album.to_string(),
            artist: artist.to_string(),
            year: 2001,
            disc_number: 1,
            track_number: id,
            byte_size: 1024,
            sample_rate: 44_100,
            bitrate: 900,
            channel_count: 2,
            format_code: 61686,
            created_at: 1_700_000_000,
            modified_at: 1_700_000_100,
        }
    }

    #[test]
    fn empty_store_has_no_max_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.max_media_id().unwrap(), None);
        assert!(!store.contains_path("a:\\x.mp3").unwrap());
    }

    #[test]
    fn ingest_writes_both_mirrors_and_log() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let record = track(7, "Song", "Album", "Artist");
        let outcome = store.ingest(&record).unwrap();

        assert!(outcome.new_album);
        assert!(outcome.new_artist);
        assert_eq!(store.media(Mirror::Primary).unwrap(), vec![record.clone()]);
        assert_eq!(store.media(Mirror::Secondary).unwrap(), vec![record]);
        assert_eq!(store.modification_log().unwrap(), vec![7]);
        assert_eq!(store.max_media_id().unwrap(), Some(7));
        assert!(store.contains_path("a:\\Music\\Song.flac").unwrap());
        assert!(store.verify_mirrors().unwrap().is_empty());
    }

    #[test]
    fn repeated_album_and_artist_are_counted() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ingest(&track(1, "One", "Same", "Band")).unwrap();
        let outcome = store.ingest(&track(2, "Two", "Same", "Band")).unwrap();

        assert!(!outcome.new_album);
        assert!(!outcome.new_artist);
        for mirror in Mirror::BOTH {
            let albums = store.albums(mirror).unwrap();
            assert_eq!(albums.len(), 1);
            assert_eq!(albums[0].track_count, 2);
            assert_eq!(albums[0].representative_id, 1);
            let artists = store.artists(mirror).unwrap();
            assert_eq!(artists.len(), 1);
            assert_eq!(artists[0].track_count, 2);
        }
    }

    #[test]
    fn albums_are_kept_in_case_insensitive_order() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ingest(&track(1, "a", "zulu", "x")).unwrap();
        store.ingest(&track(2, "b", "Alpha", "x")).unwrap();
        store.ingest(&track(3, "c", "mike", "x")).unwrap();
        store.ingest(&track(4, "d", "bravo", "x")).unwrap();

        for mirror in Mirror::BOTH {
            let names: Vec<String> = store
                .albums(mirror)
                .unwrap()
                .into_iter()
                .map(|a| a.name)
                .collect();
            assert_eq!(names, ["Alpha", "bravo", "mike", "zulu"]);
        }
        assert!(store.verify_mirrors().unwrap().is_empty());
    }

    #[test]
    fn refresh_counts_reflects_primary_tables() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ingest(&track(1, "a", "A", "X")).unwrap();
        store.ingest(&track(2, "b", "A", "Y")).unwrap();
        store.ingest(&track(3, "c", "B", "Y")).unwrap();

        let counts = store.refresh_counts().unwrap();
        assert_eq!(
            counts,
            LibraryCounts {
                media: 3,
                albums: 2,
                artists: 2
            }
        );
        assert_eq!(store.counts().unwrap(), counts);
    }

    #[test]
    fn failed_ingest_leaves_store_untouched() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ingest(&track(1, "a", "A", "X")).unwrap();
        store.conn.execute_batch("DROP TABLE MTIME_TABLE").unwrap();

        assert!(store.ingest(&track(2, "b", "B", "Y")).is_err());
        assert_eq!(store.media(Mirror::Primary).unwrap().len(), 1);
        assert_eq!(store.media(Mirror::Secondary).unwrap().len(), 1);
        assert_eq!(store.albums(Mirror::Primary).unwrap().len(), 1);
        assert_eq!(store.artists(Mirror::Secondary).unwrap().len(), 1);
        assert!(store.verify_mirrors().unwrap().is_empty());
    }

    #[test]
    fn divergent_mirror_is_reported() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO ARTIST2_TABLE (id, artist, initial, cn, created_at, modified_at, sort_name)
                 VALUES (9, 'Ghost', 'G', 1, 0, 0, 'Ghost')",
                [],
            )
            .unwrap();

        let report = store.verify_mirrors().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].secondary, schema::ARTIST2_TABLE);
        assert_eq!(report[0].missing_in_primary, 1);
        assert_eq!(report[0].missing_in_secondary, 0);
    }

    #[test]
    fn open_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.db");
        assert!(SqliteStore::open(&path).is_err());

        SqliteStore::create(&path).unwrap();
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.counts().unwrap(), LibraryCounts::default());
    }
}
