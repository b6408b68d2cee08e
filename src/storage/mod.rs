//! Storage layer for the player's media database.
//!
//! This module provides the storage abstraction the indexer writes through and
//! its SQLite implementation. The schema is the player's; the re-indexer keeps
//! the mirrored tables, aggregates and counters consistent with it.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `sqlite`: SQLite implementation over the device database
//! - `schema`: Table names, statements and schema provisioning
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use backend::LibraryStore;
pub use models::{AggregateRecord, IngestOutcome, LibraryCounts, Mirror, MirrorDivergence};
pub use sqlite::SqliteStore;
