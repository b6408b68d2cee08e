//! Media domain model.
//!
//! [`AudioFormat`] is the container allow-list, [`TrackTags`] is what the tag
//! reader hands back for one file, and [`MediaRecord`] is the row the indexer
//! writes into both media tables.

use std::path::Path;

/// Audio containers the indexer accepts.
///
/// Anything else found in a directory is skipped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Aac,
    Aiff,
    Ape,
    Flac,
    M4a,
    Mp3,
    Mp4,
    Musepack,
    Ogg,
    Opus,
    Speex,
    Wav,
    WavPack,
}

impl AudioFormat {
    /// Resolves a file extension (without the dot, any case) to a container.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        let format = match extension.to_ascii_lowercase().as_str() {
            "aac" => Self::Aac,
            "aif" | "aiff" | "aifc" => Self::Aiff,
            "ape" => Self::Ape,
            "flac" => Self::Flac,
            "m4a" => Self::M4a,
            "mp3" => Self::Mp3,
            "mp4" | "m4b" | "m4p" => Self::Mp4,
            "mpc" => Self::Musepack,
            "ogg" | "oga" => Self::Ogg,
            "opus" => Self::Opus,
            "spx" => Self::Speex,
            "wav" => Self::Wav,
            "wv" => Self::WavPack,
            _ => return None,
        };
        Some(format)
    }

    /// Resolves the container of a path from its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Numeric format code the player stores per track.
    ///
    /// Loosely follows WAVE format tags; containers the player has no code for
    /// are stored as 0.
    #[must_use]
    pub const fn format_code(self) -> i64 {
        match self {
            Self::Opus => 2373,
            Self::Mp3 => 85,
            Self::Flac => 61686,
            Self::Wav => 1,
            Self::Ogg => 22127,
            Self::M4a => 278,
            _ => 0,
        }
    }
}

/// Metadata extracted from one audio file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: String,
    pub album: String,
    pub artist: String,
    pub year: u32,
    pub track_number: u32,
    pub disc_number: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bitrate in kbps.
    pub bitrate: u32,
    pub channels: u8,
    /// Size of the file on disk.
    pub byte_length: u64,
}

/// One audio file as stored in `MEDIA_TABLE` and `MEDIA2_TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    /// Store-wide unique id, strictly increasing across runs.
    pub id: i64,
    /// Device path (`a:\folder\file.flac`).
    pub path: String,
    pub title: String,
    pub album: String,
    pub artist: String,
    pub year: i64,
    pub disc_number: i64,
    pub track_number: i64,
    pub byte_size: i64,
    pub sample_rate: i64,
    pub bitrate: i64,
    pub channel_count: i64,
    pub format_code: i64,
    /// Unix seconds of the file's inode change time.
    pub created_at: i64,
    /// Unix seconds of the file's modification time.
    pub modified_at: i64,
}

impl MediaRecord {
    /// Assembles a record from extracted tags and file facts.
    #[must_use]
    pub fn from_tags(
        id: i64,
        path: String,
        tags: &TrackTags,
        format: AudioFormat,
        created_at: i64,
        modified_at: i64,
    ) -> Self {
        Self {
            id,
            path,
            title: tags.title.clone(),
            album: tags.album.clone(),
            artist: tags.artist.clone(),
            year: i64::from(tags.year),
            disc_number: i64::from(tags.disc_number),
            track_number: i64::from(tags.track_number),
            byte_size: i64::try_from(tags.byte_length).unwrap_or(i64::MAX),
            sample_rate: i64::from(tags.sample_rate),
            bitrate: i64::from(tags.bitrate),
            channel_count: i64::from(tags.channels),
            format_code: format.format_code(),
            created_at,
            modified_at,
        }
    }

    /// First character of the title, used by the player's A-Z index.
    pub fn initial(&self) -> String {
        first_initial(&self.title)
    }
}

/// Returns the first Unicode scalar of `text`, or an empty string.
///
/// Never splits a multi-byte character.
#[must_use]
pub fn first_initial(text: &str) -> String {
    text.chars().next().map(String::from).unwrap_or_default()
}
