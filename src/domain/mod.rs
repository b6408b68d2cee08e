//! Domain layer for the re-indexer.
//!
//! Core types shared by the indexer, the store and the UI, independent of
//! SQLite, lofty or the touch device.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`media`]: Audio formats, extracted tags and media records

pub mod error;
pub mod media;

pub use error::{Result, TagsyncError};
pub use media::{first_initial, AudioFormat, MediaRecord, TrackTags};
