//! Tag extraction.
//!
//! [`TagReader`] is the seam between the indexer and the audio container
//! parsers. [`LoftyTagReader`] is the production reader.

use crate::domain::{Result, TagsyncError, TrackTags};
use lofty::{Accessor, AudioFile, Probe, TaggedFileExt};
use std::path::Path;

/// Extracts [`TrackTags`] from one audio file.
pub trait TagReader: Send {
    /// # Errors
    ///
    /// Returns [`TagsyncError::Tags`] if the file cannot be opened or parsed.
    fn read(&self, path: &Path) -> Result<TrackTags>;
}

/// Reads tags and stream properties with lofty.
///
/// The primary tag of the container is preferred, falling back to the first
/// tag present. A missing title falls back to the file stem; missing album and
/// artist become empty strings and missing numbers become 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read(&self, path: &Path) -> Result<TrackTags> {
        let tagged = Probe::open(path)
            .map_err(|e| TagsyncError::tags(path, e))?
            .read()
            .map_err(|e| TagsyncError::tags(path, e))?;

        let properties = tagged.properties();
        let mut tags = TrackTags {
            sample_rate: properties.sample_rate().unwrap_or_default(),
            bitrate: properties.audio_bitrate().unwrap_or_default(),
            channels: properties.channels().unwrap_or_default(),
            ..TrackTags::default()
        };

        if let Some(tag) = tagged.primary_tag().or(tagged.first_tag()) {
            tags.title = tag.title().map(|s| s.trim().to_string()).unwrap_or_default();
            tags.album = tag.album().map(|s| s.trim().to_string()).unwrap_or_default();
            tags.artist = tag.artist().map(|s| s.trim().to_string()).unwrap_or_default();
            tags.year = tag.year().unwrap_or_default();
            tags.track_number = tag.track().unwrap_or_default();
            tags.disc_number = tag.disk().unwrap_or_default();
        }

        if tags.title.is_empty() {
            tags.title = title_from_stem(path);
        }
        Ok(tags)
    }
}

/// File name without extension, used when a file has no title tag.
#[must_use]
pub fn title_from_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
