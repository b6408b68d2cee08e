//! Error types for the re-indexer.
//!
//! This module defines the centralized error type [`TagsyncError`] and a type alias
//! [`Result`] used throughout the crate. Each actor converts these errors into a
//! local decision (skip, log, or abort startup); none of them crosses a thread
//! boundary.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for re-indexer operations.
///
/// Variants are grouped by the collaborator that failed: the filesystem scan,
/// the SQLite store, the tag reader, the touch device and the configuration.
///
/// # Examples
///
/// ```
/// use tagsync::TagsyncError;
///
/// fn open_root() -> Result<(), TagsyncError> {
///     Err(TagsyncError::Config("library_root is empty".to_string()))
/// }
/// assert!(open_root().is_err());
/// ```
#[derive(Debug, Error)]
pub enum TagsyncError {
    /// Enumerating a directory failed.
    ///
    /// Fatal when it happens for the library root at startup; the coordinator
    /// only logs it when it happens for a directory chosen for indexing.
    #[error("Scan error: cannot read {path}: {reason}")]
    Scan {
        /// Directory that could not be read.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// A statement against the media database failed.
    ///
    /// Converts automatically from `rusqlite::Error`.
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Tag metadata could not be extracted from an audio file.
    ///
    /// Never fatal: the indexer skips the file and moves on.
    #[error("Tag error: {path}: {reason}")]
    Tags {
        /// File whose tags could not be read.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The touch input device failed or disappeared.
    #[error("Input error: {0}")]
    Input(String),
}

impl TagsyncError {
    /// Builds a [`TagsyncError::Scan`] from any displayable cause.
    pub fn scan(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Scan {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds a [`TagsyncError::Tags`] from any displayable cause.
    pub fn tags(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Tags {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// A specialized `Result` type for re-indexer operations.
pub type Result<T> = std::result::Result<T, TagsyncError>;
