//! Storage record models for the persistence layer.
//!
//! Rows read back from the player database. They are separate from the domain
//! [`MediaRecord`](crate::domain::MediaRecord) because the aggregate and counter
//! tables have no domain counterpart outside the store.

/// Which copy of a mirrored table to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    /// Table read by the player's browser (`MEDIA_TABLE`, `ALBUM_TABLE`, ...).
    Primary,
    /// Mirror read by the player's second consumer (`MEDIA2_TABLE`, ...).
    Secondary,
}

impl Mirror {
    pub const BOTH: [Self; 2] = [Self::Primary, Self::Secondary];
}

/// One album or artist row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRecord {
    /// Id of the first track that introduced this name.
    pub representative_id: i64,
    pub name: String,
    pub track_count: i64,
    pub created_at: i64,
    pub modified_at: i64,
}

/// Derived totals kept in `COUNT_TABLE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryCounts {
    pub media: i64,
    pub albums: i64,
    pub artists: i64,
}

/// What a single ingest did to the aggregate tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// The album was seen for the first time and the album tables were re-sorted.
    pub new_album: bool,
    /// The artist was seen for the first time.
    pub new_artist: bool,
}

/// A mirrored table pair whose contents differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorDivergence {
    pub primary: &'static str,
    pub secondary: &'static str,
    /// Rows present in the primary but not in the secondary.
    pub missing_in_secondary: i64,
    /// Rows present in the secondary but not in the primary.
    pub missing_in_primary: i64,
}
