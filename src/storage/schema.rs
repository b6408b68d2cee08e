//! Table names, SQL statements and schema provisioning.
//!
//! The schema belongs to the player; the re-indexer only writes into it. Each
//! mirrored pair has identical column order so `SELECT *` comparisons and the
//! `CREATE TABLE .. AS SELECT *` rebuild keep both copies interchangeable.

use super::models::Mirror;
use crate::domain::Result;
use rusqlite::Connection;

pub const MEDIA_TABLE: &str = "MEDIA_TABLE";
pub const MEDIA2_TABLE: &str = "MEDIA2_TABLE";
pub const ALBUM_TABLE: &str = "ALBUM_TABLE";
pub const ALBUM2_TABLE: &str = "ALBUM2_TABLE";
pub const ARTIST_TABLE: &str = "ARTIST_TABLE";
pub const ARTIST2_TABLE: &str = "ARTIST2_TABLE";
pub const MTIME_TABLE: &str = "MTIME_TABLE";
pub const COUNT_TABLE: &str = "COUNT_TABLE";

/// Bit depth the player expects for every track.
pub const BITS_PER_SAMPLE: i64 = 16;

#[must_use]
pub const fn media_table(mirror: Mirror) -> &'static str {
    match mirror {
        Mirror::Primary => MEDIA_TABLE,
        Mirror::Secondary => MEDIA2_TABLE,
    }
}

#[must_use]
pub const fn album_table(mirror: Mirror) -> &'static str {
    match mirror {
        Mirror::Primary => ALBUM_TABLE,
        Mirror::Secondary => ALBUM2_TABLE,
    }
}

#[must_use]
pub const fn artist_table(mirror: Mirror) -> &'static str {
    match mirror {
        Mirror::Primary => ARTIST_TABLE,
        Mirror::Secondary => ARTIST2_TABLE,
    }
}

const MEDIA_COLUMNS: &str = "
    id              INTEGER PRIMARY KEY,
    path            TEXT NOT NULL,
    title           TEXT NOT NULL,
    album           TEXT NOT NULL,
    artist          TEXT NOT NULL,
    genre           TEXT NOT NULL DEFAULT '',
    year            INTEGER NOT NULL,
    disc_number     INTEGER NOT NULL,
    track_number    INTEGER NOT NULL,
    initial         TEXT NOT NULL,
    byte_size       INTEGER NOT NULL,
    sample_rate     INTEGER NOT NULL,
    bitrate         INTEGER NOT NULL,
    bits_per_sample INTEGER NOT NULL,
    channel_count   INTEGER NOT NULL,
    format_code     INTEGER NOT NULL,
    created_at      INTEGER NOT NULL,
    modified_at     INTEGER NOT NULL,
    sort_title      TEXT NOT NULL";

const ALBUM_COLUMNS: &str = "
    id          INTEGER NOT NULL,
    album       TEXT NOT NULL,
    initial     TEXT NOT NULL,
    cn          INTEGER NOT NULL,
    created_at  INTEGER NOT NULL,
    modified_at INTEGER NOT NULL,
    flags       INTEGER NOT NULL DEFAULT 0,
    sort_name   TEXT NOT NULL";

const ARTIST_COLUMNS: &str = "
    id          INTEGER NOT NULL,
    artist      TEXT NOT NULL,
    initial     TEXT NOT NULL,
    cn          INTEGER NOT NULL,
    created_at  INTEGER NOT NULL,
    modified_at INTEGER NOT NULL,
    sort_name   TEXT NOT NULL";

/// Creates every table the re-indexer touches, if missing.
///
/// On the device the player ships this schema already; provisioning exists for
/// fresh cards, development machines and tests. `COUNT_TABLE` is seeded with its
/// three counter rows.
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn provision(conn: &Connection) -> Result<()> {
    let _span = tracing::debug_span!("schema_provision").entered();

    let mut script = String::new();
    for mirror in Mirror::BOTH {
        script.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({MEDIA_COLUMNS});\n",
            media_table(mirror)
        ));
        script.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({ALBUM_COLUMNS});\n",
            album_table(mirror)
        ));
        script.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({ARTIST_COLUMNS});\n",
            artist_table(mirror)
        ));
    }
    script.push_str(&format!("CREATE TABLE IF NOT EXISTS {MTIME_TABLE} (id INTEGER NOT NULL);\n"));
    script.push_str(&format!("CREATE TABLE IF NOT EXISTS {COUNT_TABLE} (cn INTEGER NOT NULL);\n"));
    conn.execute_batch(&script)?;

    let counters: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {COUNT_TABLE}"), [], |row| row.get(0))?;
    for _ in counters..3 {
        conn.execute(&format!("INSERT INTO {COUNT_TABLE} (cn) VALUES (0)"), [])?;
    }

    tracing::debug!("schema provisioned");
    Ok(())
}

pub const SELECT_MAX_MEDIA_ID: &str = "SELECT MAX(id) FROM MEDIA_TABLE";

pub const SELECT_MEDIA_BY_PATH: &str = "SELECT 1 FROM MEDIA_TABLE WHERE path = ?1 LIMIT 1";

/// Insert statement for one media table. Both mirrors bind the same 19 values.
#[must_use]
pub fn insert_media(mirror: Mirror) -> String {
    format!(
        "INSERT OR REPLACE INTO {} (
            id, path, title, album, artist, genre, year, disc_number, track_number,
            initial, byte_size, sample_rate, bitrate, bits_per_sample, channel_count,
            format_code, created_at, modified_at, sort_title
        ) VALUES (?1, ?2, ?3, ?4, ?5, '', ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        media_table(mirror)
    )
}

pub const SELECT_ALBUM_COUNT: &str = "SELECT cn FROM ALBUM_TABLE WHERE album = ?1";

#[must_use]
pub fn update_album_count(mirror: Mirror) -> String {
    format!("UPDATE {} SET cn = ?1 WHERE album = ?2", album_table(mirror))
}

pub const INSERT_ALBUM: &str = "INSERT INTO ALBUM_TABLE
    (id, album, initial, cn, created_at, modified_at, flags, sort_name)
    VALUES (?1, ?2, ?3, 1, ?4, ?5, 0, ?6)";

/// Re-sorts the primary album table and recreates the mirror from it.
///
/// Rows are copied in case-insensitive name order, so a plain scan of either
/// table yields albums alphabetically.
pub const REBUILD_ALBUMS_SORTED: &str = "
    CREATE TABLE ALBUM_TEMP AS SELECT * FROM ALBUM_TABLE ORDER BY album COLLATE NOCASE ASC;
    DROP TABLE ALBUM_TABLE;
    ALTER TABLE ALBUM_TEMP RENAME TO ALBUM_TABLE;
    DROP TABLE IF EXISTS ALBUM2_TABLE;
    CREATE TABLE ALBUM2_TABLE AS SELECT * FROM ALBUM_TABLE;";

pub const SELECT_ARTIST_COUNT: &str = "SELECT cn FROM ARTIST_TABLE WHERE artist = ?1";

#[must_use]
pub fn update_artist_count(mirror: Mirror) -> String {
    format!("UPDATE {} SET cn = ?1 WHERE artist = ?2", artist_table(mirror))
}

#[must_use]
pub fn insert_artist(mirror: Mirror) -> String {
    format!(
        "INSERT INTO {} (id, artist, initial, cn, created_at, modified_at, sort_name)
         VALUES (?1, ?2, ?3, 1, ?4, ?5, ?6)",
        artist_table(mirror)
    )
}

pub const INSERT_MTIME: &str = "INSERT INTO MTIME_TABLE (id) VALUES (?1)";

pub const UPDATE_COUNTS: &str = "
    UPDATE COUNT_TABLE SET cn = (SELECT COUNT(*) FROM MEDIA_TABLE) WHERE rowid = 1;
    UPDATE COUNT_TABLE SET cn = (SELECT COUNT(*) FROM ALBUM_TABLE) WHERE rowid = 2;
    UPDATE COUNT_TABLE SET cn = (SELECT COUNT(*) FROM ARTIST_TABLE) WHERE rowid = 3;";

pub const SELECT_COUNTS: &str = "SELECT cn FROM COUNT_TABLE WHERE rowid IN (1, 2, 3) ORDER BY rowid";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provision_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        provision(&conn).unwrap();
        provision(&conn).unwrap();
        let counters: i64 = conn
            .query_row("SELECT COUNT(*) FROM COUNT_TABLE", [], |row| row.get(0))
            .unwrap();
        assert_eq!(counters, 3);
    }

    #[test]
    fn mirrored_media_tables_share_column_order() {
        let conn = Connection::open_in_memory().unwrap();
        provision(&conn).unwrap();
        let columns = |table: &str| -> Vec<String> {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})")).unwrap();
            stmt.query_map([], |row| row.get::<_, String>(1))
                .unwrap()
                .map(std::result::Result::unwrap)
                .collect()
        };
        assert_eq!(columns(MEDIA_TABLE), columns(MEDIA2_TABLE));
        assert_eq!(columns(ALBUM_TABLE), columns(ALBUM2_TABLE));
        assert_eq!(columns(ARTIST_TABLE), columns(ARTIST2_TABLE));
        assert_eq!(columns(MEDIA_TABLE).len(), 19);
    }
}
