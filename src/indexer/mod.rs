//! Indexing of one card directory into the media database.
//!
//! # Modules
//!
//! - `scanner`: Lists the files of a directory and classifies them by container
//! - `tags`: Tag extraction seam and the lofty-backed reader
//! - `sync`: The indexing run itself

pub mod scanner;
pub mod sync;
pub mod tags;

pub use scanner::{scan_directory, ScannedFile};
pub use sync::{IndexerOptions, LibraryIndexer, SyncReport};
pub use tags::{LoftyTagReader, TagReader};
