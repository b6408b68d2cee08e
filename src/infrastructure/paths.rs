//! Path and timestamp helpers for the player's storage layout.
//!
//! The player addresses files on the card as `a:\folder\file.ext`: a drive
//! prefix followed by the path relative to the card root, with backslash
//! separators. These helpers translate host paths into that form.

use std::fs::Metadata;
use std::path::Path;

/// Default mount point of the removable card.
pub const DEFAULT_LIBRARY_ROOT: &str = "/mnt/sd_0";

/// Default location of the player's media database.
pub const DEFAULT_DATABASE: &str = "/data/usrlocal_media.db";

/// Default touch panel event device.
pub const DEFAULT_TOUCH_DEVICE: &str = "/dev/input/event2";

/// Default drive prefix the player uses for the card.
pub const DEFAULT_DRIVE_PREFIX: &str = "a:";

/// Converts a host path under `root` into the player's device path.
///
/// Paths outside `root` are converted as-is, minus any leading separator.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tagsync::infrastructure::device_path;
///
/// let path = device_path(Path::new("/mnt/sd_0"), Path::new("/mnt/sd_0/Band/01.flac"), "a:");
/// assert_eq!(path, r"a:\Band\01.flac");
/// ```
#[must_use]
pub fn device_path(root: &Path, file: &Path, drive_prefix: &str) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let relative = relative.to_string_lossy().replace('/', "\\");
    format!("{drive_prefix}\\{}", relative.trim_start_matches('\\'))
}

/// Returns `(created_at, modified_at)` as Unix seconds.
///
/// `created_at` is the inode change time on Unix, which is what the player
/// compares against; elsewhere it falls back to the creation time.
#[must_use]
pub fn file_times(metadata: &Metadata) -> (i64, i64) {
    let modified = metadata
        .modified()
        .map(system_time_secs)
        .unwrap_or_default();
    (change_time(metadata).unwrap_or(modified), modified)
}

fn system_time_secs(time: std::time::SystemTime) -> i64 {
    chrono::DateTime::<chrono::Utc>::from(time).timestamp()
}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> Option<i64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.ctime())
}

#[cfg(not(unix))]
fn change_time(metadata: &Metadata) -> Option<i64> {
    metadata.created().ok().map(system_time_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths_use_backslashes() {
        let path = device_path(
            Path::new("/mnt/sd_0/"),
            Path::new("/mnt/sd_0/Artist - Album/CD1/01 Intro.mp3"),
            "a:",
        );
        assert_eq!(path, r"a:\Artist - Album\CD1\01 Intro.mp3");
    }

    #[test]
    fn foreign_paths_keep_their_components() {
        let path = device_path(Path::new("/mnt/sd_0"), Path::new("/tmp/x.ogg"), "b:");
        assert_eq!(path, r"b:\tmp\x.ogg");
    }

    #[test]
    fn file_times_are_positive_for_real_files() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let (created, modified) = file_times(&file.as_file().metadata().unwrap());
        assert!(created > 0);
        assert!(modified > 0);
    }
}
