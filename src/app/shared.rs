//! Process-wide state shared by the three actors.
//!
//! Every field is an independent cell and no operation takes a lock: readers
//! never see a torn value, but two fields read one after the other may come
//! from different instants. There is no cross-field transaction and none
//! should be assumed.
//!
//! The loading label is an owned `Arc<String>` swapped as a whole through
//! [`ArcSwap`], so neither publishing nor reading it blocks. A version counter
//! is bumped on every publish so the renderer can tell that a new label arrived
//! even when two consecutive tracks share a title.

use super::modes::UiMode;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

/// Label shown while nothing specific is loading.
pub const SENTINEL_LABEL: &str = "[waiting]";

/// Shared cells written by one actor and observed by the others.
///
/// Construct one per process and hand out `Arc<SharedState>` clones.
#[derive(Debug)]
pub struct SharedState {
    mode: AtomicU32,
    touch_x: AtomicU32,
    touch_y: AtomicU32,
    page: AtomicU32,
    exit_requested: AtomicBool,
    label: ArcSwap<String>,
    label_version: AtomicU64,
    sentinel: Arc<String>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    /// Creates state in `Initializing` mode with the sentinel label.
    #[must_use]
    pub fn new() -> Self {
        let sentinel = Arc::new(SENTINEL_LABEL.to_string());
        Self {
            mode: AtomicU32::new(UiMode::Initializing.code()),
            touch_x: AtomicU32::new(0),
            touch_y: AtomicU32::new(0),
            page: AtomicU32::new(0),
            exit_requested: AtomicBool::new(false),
            label: ArcSwap::new(Arc::clone(&sentinel)),
            label_version: AtomicU64::new(0),
            sentinel,
        }
    }

    pub fn mode(&self) -> UiMode {
        UiMode::from_code(self.mode.load(Ordering::Acquire))
    }

    pub fn set_mode(&self, mode: UiMode) {
        self.mode.store(mode.code(), Ordering::Release);
    }

    /// Last X coordinate reported by the touch panel.
    pub fn touch_x(&self) -> u32 {
        self.touch_x.load(Ordering::Acquire)
    }

    pub fn set_touch_x(&self, x: u32) {
        self.touch_x.store(x, Ordering::Release);
    }

    /// Last Y coordinate reported by the touch panel.
    pub fn touch_y(&self) -> u32 {
        self.touch_y.load(Ordering::Acquire)
    }

    pub fn set_touch_y(&self, y: u32) {
        self.touch_y.store(y, Ordering::Release);
    }

    /// Catalog page currently on screen.
    pub fn page(&self) -> u32 {
        self.page.load(Ordering::Acquire)
    }

    pub fn set_page(&self, page: u32) {
        self.page.store(page, Ordering::Release);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::Acquire)
    }

    /// Asks every actor to stop at its next loop iteration.
    pub fn request_exit(&self) {
        self.exit_requested.store(true, Ordering::Release);
    }

    /// Current loading label. Cheap: clones an `Arc`.
    pub fn label(&self) -> Arc<String> {
        self.label.load_full()
    }

    /// Version of the label, bumped on every publish.
    pub fn label_version(&self) -> u64 {
        self.label_version.load(Ordering::Acquire)
    }

    /// Returns the label together with its version.
    ///
    /// The pair may be slightly out of step; callers only use the version to
    /// decide whether to read again.
    pub fn label_snapshot(&self) -> (u64, Arc<String>) {
        let version = self.label_version();
        (version, self.label())
    }

    /// Publishes a new loading label.
    pub fn set_label(&self, label: impl Into<String>) {
        self.store_label(Arc::new(label.into()));
    }

    /// Resets the label to [`SENTINEL_LABEL`].
    pub fn clear_label(&self) {
        self.store_label(Arc::clone(&self.sentinel));
    }

    fn store_label(&self, label: Arc<String>) {
        self.label.store(label);
        self.label_version.fetch_add(1, Ordering::AcqRel);
    }

    /// Whether the label currently holds the sentinel.
    pub fn label_is_sentinel(&self) -> bool {
        let current = self.label.load();
        Arc::ptr_eq(&*current, &self.sentinel)
    }
}
