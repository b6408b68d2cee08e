//! Tagsync: a touch-driven re-indexer for a portable player's media database.
//!
//! Tagsync runs on the player itself and provides:
//! - A paged, newest-first list of the folders at the root of the SD card
//! - A yes/no confirmation before a folder is indexed
//! - Tag extraction from every supported audio file in the folder
//! - Transactional writes into the player's SQLite library, keeping the
//!   primary and secondary table sets identical
//! - Album/artist aggregates, the album sort rebuild and library counters

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! Three actors share one [`app::SharedState`]:
//!
//! ```text
//! ┌──────────────┐  touch samples   ┌───────────────────────┐
//! │ input actor  │ ───────────────► │ coordinator (main)    │
//! │ (input/)     │  1-slot mailbox  │ - handle_event (app/) │
//! └──────────────┘                  │ - LibraryIndexer      │
//!        │                          │   (indexer/, storage/)│
//!        │ touch x/y                └───────────────────────┘
//!        ▼                                     │ mode, page, label
//! ┌─────────────────────────────────────────────────────────┐
//! │  SharedState: atomics + versioned label + exit flag     │
//! └─────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                     ┌──────────────────┐
//!                     │ render actor     │
//!                     │ (ui/)            │
//!                     └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Shared state, the UI state machine and the coordinator actor
//! - [`catalog`]: Card-root folder listing and pagination
//! - [`domain`]: Core domain types (media records, errors)
//! - [`indexer`]: Directory scan, tag extraction and store synchronization
//! - [`infrastructure`]: Device path conventions and defaults
//! - [`input`]: Touch device decoding and the touch mailbox
//! - [`observability`]: Tracing setup with a rotating log file
//! - [`storage`]: The SQLite media library
//! - [`ui`]: Screen layout, composition and the render actor
//!
//! # Configuration
//!
//! All settings are optional and read from a TOML file:
//!
//! ```toml
//! library_root = "/mnt/sd_0"
//! database = "/data/usrlocal_media.db"
//! touch_device = "/dev/input/event2"
//! log_level = "debug"
//! log_file = "/mnt/sd_0/tagsync.log"
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod indexer;
pub mod infrastructure;
pub mod input;
pub mod observability;
pub mod storage;
pub mod ui;

pub use domain::{Result, TagsyncError};
pub use ui::Theme;

use app::CoordinatorSettings;
use indexer::IndexerOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use ui::RenderSettings;

/// Runtime configuration.
///
/// Every field has a default matching the player's layout, so an empty file
/// (or no file at all) is a valid configuration.
///
/// # Example
///
/// ```rust
/// use tagsync::Config;
///
/// let config = Config::from_toml_str("log_level = \"debug\"\npage_debounce_ms = 80").unwrap();
/// assert_eq!(config.log_level, "debug");
/// assert_eq!(config.page_debounce_ms, 80);
/// assert_eq!(config.frame_interval_ms, 16);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Card mount point; its direct subfolders are offered for indexing.
    pub library_root: PathBuf,

    /// The player's media database.
    pub database: PathBuf,

    /// Touch panel event device.
    pub touch_device: PathBuf,

    /// Drive letter the player prefixes stored paths with.
    pub drive_prefix: String,

    /// Default tracing filter. `RUST_LOG` wins when set.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub log_level: String,

    /// Optional log file, rotated at 1 MiB.
    pub log_file: Option<PathBuf>,

    /// Render loop period in milliseconds.
    pub frame_interval_ms: u64,

    /// Label poll period while indexing, in milliseconds.
    pub loading_poll_ms: u64,

    /// Touch quiet period after a page flip, in milliseconds.
    pub page_debounce_ms: u64,

    /// How long the input actor blocks before re-checking the exit flag.
    pub input_poll_ms: u64,

    /// Leave files whose device path is already stored untouched.
    pub skip_existing: bool,

    /// Path to a custom TOML theme file. See [`ui::theme`] for format.
    pub theme_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from(infrastructure::DEFAULT_LIBRARY_ROOT),
            database: PathBuf::from(infrastructure::DEFAULT_DATABASE),
            touch_device: PathBuf::from(infrastructure::DEFAULT_TOUCH_DEVICE),
            drive_prefix: infrastructure::DEFAULT_DRIVE_PREFIX.to_string(),
            log_level: "info".to_string(),
            log_file: None,
            frame_interval_ms: 16,
            loading_poll_ms: 1,
            page_debounce_ms: 50,
            input_poll_ms: 500,
            skip_existing: true,
            theme_file: None,
        }
    }
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TagsyncError::Config`] on malformed TOML, unknown keys or
    /// values of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TagsyncError::Config(e.to_string()))
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`TagsyncError::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| TagsyncError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub const fn input_poll(&self) -> Duration {
        Duration::from_millis(self.input_poll_ms)
    }

    pub const fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            frame_interval: Duration::from_millis(self.frame_interval_ms),
            loading_poll: Duration::from_millis(self.loading_poll_ms),
        }
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            page_debounce: Duration::from_millis(self.page_debounce_ms),
            ..CoordinatorSettings::default()
        }
    }

    pub fn indexer_options(&self) -> IndexerOptions {
        IndexerOptions {
            library_root: self.library_root.clone(),
            drive_prefix: self.drive_prefix.clone(),
            skip_existing: self.skip_existing,
        }
    }

    /// Loads the configured theme, or the built-in one.
    ///
    /// A theme file that fails to load is logged and replaced by the default.
    pub fn theme(&self) -> Theme {
        self.theme_file.as_ref().map_or_else(Theme::default, |theme_file| {
            Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::warn!(theme_file = ?theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        })
    }
}
