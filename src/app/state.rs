//! Coordinator-owned state of the UI state machine.
//!
//! [`AppState`] is the single source of truth for the current mode, page and
//! selection. The renderer never reads it directly; it observes the values the
//! coordinator publishes to [`SharedState`](crate::app::SharedState).

use super::modes::UiMode;
use crate::catalog::{DirectoryCatalog, DirectoryEntry, Slot};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: UiMode,
    /// Zero-based catalog page on screen.
    pub page: u32,
    /// Directory awaiting confirmation.
    pub selected: Option<DirectoryEntry>,
    pub catalog: Arc<DirectoryCatalog>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Arc<DirectoryCatalog>) -> Self {
        Self {
            mode: UiMode::Initializing,
            page: 0,
            selected: None,
            catalog,
        }
    }

    /// Entry shown in `row` of the current page, if it is not a placeholder.
    pub fn entry_at(&self, row: usize) -> Option<DirectoryEntry> {
        self.catalog
            .page(self.page)
            .get(row)
            .and_then(Slot::entry)
            .cloned()
    }

    pub fn has_next_page(&self) -> bool {
        self.catalog.has_next(self.page)
    }

    pub const fn has_previous_page(&self) -> bool {
        self.page > 0
    }
}
