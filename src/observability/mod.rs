//! Logging for the re-indexer.
//!
//! Everything logs through `tracing`. This module wires the subscriber: stdout
//! for interactive runs and an optional size-rotated file on the card so a run
//! on the device leaves a log behind.
//!
//! # Configuration
//!
//! Log level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `log_level` in the configuration file or `--log-level`
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Tracing initialization and subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::RotatingFileWriter;
pub use init::init_tracing;
