//! Application layer coordinating state, events, and actions.
//!
//! This module holds the UI state machine and the coordinator actor that drives
//! it, plus the [`SharedState`] cells every actor observes.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Touch → Event → handle_event → AppState mutation → Actions → SharedState / Indexer
//!                      ↑                                            ↓
//!                      └──────── PageLoaded / IndexingFinished ─────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: UI mode type
//! - [`state`]: Coordinator-owned state
//! - [`shared`]: Cells shared between the actors
//! - [`coordinator`]: The actor executing actions

pub mod actions;
pub mod coordinator;
pub mod handler;
pub mod modes;
pub mod shared;
pub mod state;

pub use actions::Action;
pub use coordinator::{Coordinator, CoordinatorSettings};
pub use handler::{handle_event, Event};
pub use modes::UiMode;
pub use shared::{SharedState, SENTINEL_LABEL};
pub use state::AppState;
