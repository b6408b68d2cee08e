//! Coordinator actor.
//!
//! Owns the [`AppState`] and the indexer. It waits on the touch mailbox, feeds
//! each sample through [`handle_event`] and executes the returned actions.
//! Actions that complete asynchronously from the user's point of view (a page
//! flip, an indexing run) push a follow-up event that is handled before the
//! next touch is taken.

use crate::app::handler::{handle_event, Event};
use crate::app::{Action, AppState, SharedState};
use crate::catalog::DirectoryCatalog;
use crate::indexer::{LibraryIndexer, SyncReport};
use crate::input::MailboxReceiver;
use crate::ui::layout::TouchPoint;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Timing knobs of the coordinator loop.
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorSettings {
    /// Longest wait for a touch before the exit flag is checked again.
    pub poll_interval: Duration,
    /// Pause after a page flip during which touches are discarded.
    pub page_debounce: Duration,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            page_debounce: Duration::from_millis(50),
        }
    }
}

pub struct Coordinator {
    state: AppState,
    shared: Arc<SharedState>,
    mailbox: MailboxReceiver<TouchPoint>,
    indexer: LibraryIndexer,
    settings: CoordinatorSettings,
    last_report: Option<SyncReport>,
}

impl Coordinator {
    #[must_use]
    pub fn new(
        catalog: Arc<DirectoryCatalog>,
        shared: Arc<SharedState>,
        mailbox: MailboxReceiver<TouchPoint>,
        indexer: LibraryIndexer,
        settings: CoordinatorSettings,
    ) -> Self {
        Self {
            state: AppState::new(catalog),
            shared,
            mailbox,
            indexer,
            settings,
            last_report: None,
        }
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Report of the most recent successful indexing run.
    pub const fn last_report(&self) -> Option<&SyncReport> {
        self.last_report.as_ref()
    }

    /// Runs until exit is requested or the input actor goes away.
    ///
    /// Always leaves the exit flag set on return.
    pub fn run(&mut self) {
        let _span = tracing::info_span!("coordinator").entered();

        self.dispatch(Event::Started);
        while !self.shared.exit_requested() {
            match self.mailbox.wait(self.settings.poll_interval) {
                Ok(Some(point)) => self.dispatch(Event::Touch(point)),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "touch input gone, shutting down");
                    break;
                }
            }
        }

        self.shared.request_exit();
        tracing::info!("coordinator stopped");
    }

    /// Handles `event` and every follow-up event it causes.
    pub fn dispatch(&mut self, event: Event) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for action in handle_event(&mut self.state, &event) {
                if let Some(follow_up) = self.execute(action) {
                    pending.push_back(follow_up);
                }
            }
        }
    }

    fn execute(&mut self, action: Action) -> Option<Event> {
        tracing::trace!(action = ?action, "executing");
        match action {
            Action::PublishMode(mode) => {
                self.shared.set_mode(mode);
                None
            }
            Action::ShowPage(page) => {
                self.shared.set_page(page);
                None
            }
            Action::FlipPage(page) => {
                self.shared.set_page(page);
                std::thread::sleep(self.settings.page_debounce);
                self.discard_pending_touches();
                Some(Event::PageLoaded)
            }
            Action::PublishLabel(label) => {
                self.shared.set_label(label);
                None
            }
            Action::ClearLabel => {
                self.shared.clear_label();
                None
            }
            Action::RunIndexer(dir) => {
                match self.indexer.run(&dir) {
                    Ok(report) => self.last_report = Some(report),
                    Err(e) => tracing::error!(dir = ?dir, error = %e, "indexing failed"),
                }
                self.discard_pending_touches();
                Some(Event::IndexingFinished)
            }
            Action::Exit => {
                self.shared.request_exit();
                None
            }
        }
    }

    fn discard_pending_touches(&self) {
        let dropped = self.mailbox.drain();
        if dropped > 0 {
            tracing::debug!(dropped, "discarded touches made while busy");
        }
    }
}
