//! Infrastructure layer for filesystem and device conventions.
//!
//! Knows where things live on the player (card mount, database, touch device)
//! and how the player spells paths.

pub mod paths;

pub use paths::{
    device_path, file_times, DEFAULT_DATABASE, DEFAULT_DRIVE_PREFIX, DEFAULT_LIBRARY_ROOT,
    DEFAULT_TOUCH_DEVICE,
};
