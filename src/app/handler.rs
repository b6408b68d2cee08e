//! Event handling and state transition logic.
//!
//! This module implements the UI state machine. It translates touches and
//! lifecycle events into state changes and action sequences, and never touches
//! the shared state, the store or the clock itself.
//!
//! # Architecture
//!
//! 1. Events arrive from the mailbox or from completed actions
//! 2. [`handle_event`] hit-tests the touch against the current screen
//! 3. [`AppState`] is mutated
//! 4. Actions are collected and returned for execution
//!
//! # Transitions
//!
//! | Mode    | Touch                         | Result                              |
//! |---------|-------------------------------|-------------------------------------|
//! | Index   | middle button, next page      | page + 1 through `LoadingDirectories` |
//! | Index   | left button, page > 0         | page - 1 through `LoadingDirectories` |
//! | Index   | list row with a directory     | label := name, `Confirm`            |
//! | Index   | exit corner                   | exit                                |
//! | Confirm | left button ("yes")           | `Loading`, run indexer, `Index`     |
//! | Confirm | middle button ("no")          | `Index`                             |
//!
//! Any other touch, and every touch outside `Index` and `Confirm`, is ignored.

use crate::app::{Action, AppState};
use crate::app::modes::UiMode;
use crate::ui::layout::{self, ConfirmTarget, IndexTarget, TouchPoint};

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The catalog is built; show the first page.
    Started,
    /// A completed touch sample.
    Touch(TouchPoint),
    /// A page flip finished its debounce window.
    PageLoaded,
    /// The indexer returned, successfully or not.
    IndexingFinished,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Deterministic: the same state and event always produce the same new state
/// and the same actions.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use std::sync::Arc;
/// use tagsync::app::{handle_event, Action, AppState, Event, UiMode};
/// use tagsync::catalog::DirectoryCatalog;
///
/// let catalog = Arc::new(DirectoryCatalog::from_entries(PathBuf::from("/mnt/sd_0"), Vec::new()));
/// let mut state = AppState::new(catalog);
/// let actions = handle_event(&mut state, &Event::Started);
/// assert_eq!(actions, vec![Action::ShowPage(0), Action::PublishMode(UiMode::Index)]);
/// ```
#[must_use]
pub fn handle_event(state: &mut AppState, event: &Event) -> Vec<Action> {
    let _span = tracing::debug_span!("handle_event", event = ?event, mode = ?state.mode).entered();

    match *event {
        Event::Started => {
            state.page = 0;
            state.selected = None;
            state.mode = UiMode::Index;
            vec![Action::ShowPage(0), Action::PublishMode(UiMode::Index)]
        }
        Event::PageLoaded => {
            if state.mode != UiMode::LoadingDirectories {
                return vec![];
            }
            state.mode = UiMode::Index;
            vec![Action::PublishMode(UiMode::Index)]
        }
        Event::IndexingFinished => {
            if state.mode != UiMode::Loading {
                return vec![];
            }
            state.mode = UiMode::Index;
            state.selected = None;
            vec![Action::PublishMode(UiMode::Index)]
        }
        Event::Touch(_) if !state.mode.accepts_touch() => {
            tracing::trace!("touch ignored while busy");
            vec![]
        }
        Event::Touch(point) if state.mode == UiMode::Confirm => on_confirm_touch(state, point),
        Event::Touch(point) => on_index_touch(state, point),
    }
}

fn on_index_touch(state: &mut AppState, point: TouchPoint) -> Vec<Action> {
    match layout::index_target(point) {
        Some(IndexTarget::NextPage) if state.has_next_page() => {
            state.page += 1;
            flip_to(state)
        }
        Some(IndexTarget::PreviousPage) if state.has_previous_page() => {
            state.page -= 1;
            flip_to(state)
        }
        Some(IndexTarget::Row(row)) => {
            let Some(entry) = state.entry_at(row) else {
                tracing::trace!(row, "placeholder row");
                return vec![];
            };
            tracing::debug!(directory = %entry.relative_path, "directory selected");
            let label = entry.relative_path.clone();
            state.selected = Some(entry);
            state.mode = UiMode::Confirm;
            vec![Action::PublishLabel(label), Action::PublishMode(UiMode::Confirm)]
        }
        Some(IndexTarget::Exit) => {
            tracing::debug!("exit requested");
            vec![Action::Exit]
        }
        Some(IndexTarget::NextPage | IndexTarget::PreviousPage) | None => vec![],
    }
}

fn flip_to(state: &mut AppState) -> Vec<Action> {
    tracing::debug!(page = state.page, "page flip");
    state.mode = UiMode::LoadingDirectories;
    vec![
        Action::PublishMode(UiMode::LoadingDirectories),
        Action::FlipPage(state.page),
    ]
}

fn on_confirm_touch(state: &mut AppState, point: TouchPoint) -> Vec<Action> {
    match layout::confirm_target(point) {
        Some(ConfirmTarget::Yes) => {
            let Some(entry) = state.selected.as_ref() else {
                state.mode = UiMode::Index;
                return vec![Action::ClearLabel, Action::PublishMode(UiMode::Index)];
            };
            let dir = state.catalog.resolve(entry);
            state.mode = UiMode::Loading;
            vec![Action::PublishMode(UiMode::Loading), Action::RunIndexer(dir)]
        }
        Some(ConfirmTarget::No) => {
            state.selected = None;
            state.mode = UiMode::Index;
            vec![Action::ClearLabel, Action::PublishMode(UiMode::Index)]
        }
        None => vec![],
    }
}
