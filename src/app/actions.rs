//! Actions representing side effects to be executed by the coordinator.
//!
//! This module defines the [`Action`] type, the commands produced by the event
//! handler after processing a touch or a lifecycle event. Actions bridge pure
//! state transitions and effectful operations like publishing to the shared
//! state, running the indexer or stopping the actors.
//!
//! # Architecture
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! coordinator executes them in order; some of them feed a follow-up
//! [`Event`](crate::app::Event) back into the handler when they complete.

use super::modes::UiMode;
use std::path::PathBuf;

/// Commands executed by the [`Coordinator`](crate::app::Coordinator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Publishes a new mode for the renderer.
    PublishMode(UiMode),

    /// Publishes the page to draw without any transition.
    ShowPage(u32),

    /// Publishes a new page, waits out the debounce window and discards touches
    /// made meanwhile. Completes with [`Event::PageLoaded`](crate::app::Event::PageLoaded).
    FlipPage(u32),

    /// Publishes the loading label.
    PublishLabel(String),

    /// Resets the loading label to the sentinel.
    ClearLabel,

    /// Indexes one directory on the coordinator thread. Completes with
    /// [`Event::IndexingFinished`](crate::app::Event::IndexingFinished).
    RunIndexer(PathBuf),

    /// Asks every actor to stop.
    Exit,
}
