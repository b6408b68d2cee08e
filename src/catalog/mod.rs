//! Paginated list of top-level library folders.
//!
//! The catalog is captured once at startup from the immediate subdirectories of
//! the library root and never changes afterwards, so it is shared read-only
//! between the coordinator and the rendering actor.
//!
//! # Ordering
//!
//! Most recently modified first. Ties on the timestamp fall back to the
//! relative path so the order is deterministic across runs.

use crate::domain::{Result, TagsyncError};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Number of folders shown per page.
pub const PAGE_SIZE: usize = 5;

/// Text drawn for an empty slot.
///
/// Emptiness is carried by [`Slot::Placeholder`], never by comparing text, so a
/// folder that happens to carry this name is still selectable.
pub const PLACEHOLDER_TEXT: &str = " - ";

/// One top-level folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Path relative to the library root.
    pub relative_path: String,
    pub modified_at: DateTime<Utc>,
}

impl Ord for DirectoryEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .modified_at
            .cmp(&self.modified_at)
            .then_with(|| self.relative_path.cmp(&other.relative_path))
    }
}

impl PartialOrd for DirectoryEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A position on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Directory(DirectoryEntry),
    Placeholder,
}

impl Slot {
    /// Text to draw for this slot.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Directory(entry) => &entry.relative_path,
            Self::Placeholder => PLACEHOLDER_TEXT,
        }
    }

    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    pub const fn entry(&self) -> Option<&DirectoryEntry> {
        match self {
            Self::Directory(entry) => Some(entry),
            Self::Placeholder => None,
        }
    }
}

/// Exactly [`PAGE_SIZE`] slots.
pub type Page = [Slot; PAGE_SIZE];

/// Ordered folders under the library root.
#[derive(Debug, Clone, Default)]
pub struct DirectoryCatalog {
    root: PathBuf,
    entries: BTreeSet<DirectoryEntry>,
}

impl DirectoryCatalog {
    /// Scans the immediate subdirectories of `root`.
    ///
    /// Entries that vanish or cannot be stat'ed while scanning are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TagsyncError::Scan`] if `root` itself cannot be read.
    pub fn build(root: &Path) -> Result<Self> {
        let _span = tracing::debug_span!("catalog_build", root = %root.display()).entered();

        std::fs::read_dir(root).map_err(|e| TagsyncError::scan(root, e))?;

        let mut entries = BTreeSet::new();
        for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let modified = entry
                .metadata()
                .map_err(|e| e.to_string())
                .and_then(|m| m.modified().map_err(|e| e.to_string()));
            let modified_at = match modified {
                Ok(time) => DateTime::<Utc>::from(time),
                Err(e) => {
                    tracing::debug!(path = %entry.path().display(), error = %e, "cannot stat directory");
                    continue;
                }
            };
            let relative_path = entry
                .path()
                .strip_prefix(root)
                .unwrap_or_else(|_| entry.path())
                .to_string_lossy()
                .into_owned();
            entries.insert(DirectoryEntry {
                relative_path,
                modified_at,
            });
        }

        tracing::info!(count = entries.len(), "directory catalog built");

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    /// Builds a catalog from already-known entries.
    #[must_use]
    pub fn from_entries(root: PathBuf, entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        Self {
            root,
            entries: entries.into_iter().collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pages; an empty catalog still has its single page 0.
    pub fn page_count(&self) -> u32 {
        let pages = self.entries.len().div_ceil(PAGE_SIZE).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether a page after `page` holds at least one entry.
    pub fn has_next(&self, page: u32) -> bool {
        (page as usize + 1) * PAGE_SIZE < self.entries.len()
    }

    /// Clamps a page index into the valid range.
    pub fn clamp_page(&self, page: u32) -> u32 {
        page.min(self.page_count() - 1)
    }

    /// Returns the slots of page `page`, padded with placeholders.
    ///
    /// Pages beyond the last one are all placeholders.
    pub fn page(&self, page: u32) -> Page {
        let mut iter = self.entries.iter().skip(page as usize * PAGE_SIZE);
        std::array::from_fn(|_| {
            iter.next()
                .map_or(Slot::Placeholder, |entry| Slot::Directory(entry.clone()))
        })
    }

    /// Absolute path of an entry.
    pub fn resolve(&self, entry: &DirectoryEntry) -> PathBuf {
        self.root.join(&entry.relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, secs: i64) -> DirectoryEntry {
        DirectoryEntry {
            relative_path: name.to_string(),
            modified_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    fn catalog(count: usize) -> DirectoryCatalog {
        DirectoryCatalog::from_entries(
            PathBuf::from("/mnt/sd_0"),
            (0..count).map(|i| entry(&format!("dir{}", i + 1), 1_000 - i as i64)),
        )
    }

    #[test]
    fn orders_most_recent_first_with_path_tiebreak() {
        let catalog = DirectoryCatalog::from_entries(
            PathBuf::from("/r"),
            vec![entry("b", 10), entry("a", 10), entry("new", 20)],
        );
        let names: Vec<_> = catalog.page(0).iter().map(|s| s.display_text().to_string()).collect();
        assert_eq!(names, vec!["new", "a", "b", PLACEHOLDER_TEXT, PLACEHOLDER_TEXT]);
    }

    #[test]
    fn seven_entries_span_two_pages() {
        let catalog = catalog(7);
        let first = catalog.page(0);
        assert_eq!(first[0].display_text(), "dir1");
        assert_eq!(first[4].display_text(), "dir5");

        let second = catalog.page(1);
        assert_eq!(second[0].display_text(), "dir6");
        assert_eq!(second[1].display_text(), "dir7");
        assert!(second[2..].iter().all(Slot::is_placeholder));

        assert!(catalog.page(2).iter().all(Slot::is_placeholder));
        assert_eq!(catalog.page_count(), 2);
        assert!(catalog.has_next(0));
        assert!(!catalog.has_next(1));
    }

    #[test]
    fn last_page_is_padded_for_any_size() {
        for n in 1..=17 {
            let catalog = catalog(n);
            let last = ((n - 1) / PAGE_SIZE) as u32;
            let page = catalog.page(last);
            let real = page.iter().filter(|s| !s.is_placeholder()).count();
            assert_eq!(real, n - last as usize * PAGE_SIZE, "n = {n}");
            assert!(catalog.page(last + 1).iter().all(Slot::is_placeholder));
            assert_eq!(catalog.page_count(), last + 1);
        }
    }

    #[test]
    fn empty_catalog_has_single_placeholder_page() {
        let catalog = catalog(0);
        assert!(catalog.is_empty());
        assert_eq!(catalog.page_count(), 1);
        assert_eq!(catalog.clamp_page(3), 0);
        assert!(catalog.page(0).iter().all(Slot::is_placeholder));
    }

    #[test]
    fn build_fails_on_missing_root() {
        let err = DirectoryCatalog::build(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, TagsyncError::Scan { .. }));
    }

    #[test]
    fn build_lists_only_directories() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("Album A")).unwrap();
        std::fs::create_dir(root.path().join("Album B")).unwrap();
        std::fs::write(root.path().join("loose.mp3"), b"x").unwrap();

        let catalog = DirectoryCatalog::build(root.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let mut names: Vec<_> = catalog
            .page(0)
            .iter()
            .filter_map(Slot::entry)
            .map(|e| e.relative_path.clone())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Album A", "Album B"]);
        let first = catalog.page(0)[0].entry().cloned().unwrap();
        assert_eq!(catalog.resolve(&first).parent(), Some(root.path()));
    }
}
