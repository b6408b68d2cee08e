//! Rendering actor.
//!
//! Polls the shared state once per frame interval and redraws when the mode or
//! the page changes. While loading it switches to a faster poll of the label
//! alone and redraws the progress view each time a new label is published,
//! until the label returns to the sentinel or the mode moves on. On exit it
//! leaves the farewell screen on the panel.

use crate::app::{SharedState, UiMode};
use crate::catalog::DirectoryCatalog;
use crate::ui::surface::Surface;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{compose, compose_farewell, Screen};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Timing knobs of the render loop.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    /// Poll period of the main loop (about 60 Hz by default).
    pub frame_interval: Duration,
    /// Poll period of the label while loading.
    pub loading_poll: Duration,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_micros(16_666),
            loading_poll: Duration::from_millis(1),
        }
    }
}

/// Draws screens from the shared state.
pub struct Renderer<S: Surface> {
    surface: S,
    shared: Arc<SharedState>,
    catalog: Arc<DirectoryCatalog>,
    theme: Theme,
    settings: RenderSettings,
}

impl<S: Surface> Renderer<S> {
    #[must_use]
    pub fn new(
        surface: S,
        shared: Arc<SharedState>,
        catalog: Arc<DirectoryCatalog>,
        theme: Theme,
        settings: RenderSettings,
    ) -> Self {
        Self {
            surface,
            shared,
            catalog,
            theme,
            settings,
        }
    }

    /// Runs until exit is requested, then draws the farewell screen.
    ///
    /// Returns the surface so callers can inspect or reuse it.
    pub fn run(mut self) -> S {
        let _span = tracing::debug_span!("renderer").entered();

        let mut shown: Option<(UiMode, u32)> = None;
        while !self.shared.exit_requested() {
            let current = (self.shared.mode(), self.shared.page());
            if shown != Some(current) {
                shown = Some(current);
                let (mode, page) = current;
                tracing::debug!(mode = ?mode, page, "mode change");
                if mode == UiMode::Loading {
                    self.follow_loading(page);
                } else {
                    self.draw_mode(mode, page);
                }
            }
            thread::sleep(self.settings.frame_interval);
        }

        self.present(&compose_farewell(&self.theme));
        tracing::debug!("renderer stopped");
        self.surface
    }

    fn draw_mode(&mut self, mode: UiMode, page: u32) {
        let label = self.shared.label();
        let screen = compose(mode, &self.catalog.page(page), &label, &self.theme);
        self.present(&screen);
    }

    fn follow_loading(&mut self, page: u32) {
        let mut drawn = None;
        loop {
            if self.shared.exit_requested() || self.shared.mode() != UiMode::Loading {
                return;
            }
            let (version, label) = self.shared.label_snapshot();
            if drawn != Some(version) {
                if self.shared.label_is_sentinel() {
                    if drawn.is_some() {
                        return;
                    }
                    // Run already over; wait for the mode change.
                    thread::sleep(self.settings.loading_poll);
                    continue;
                }
                drawn = Some(version);
                let screen = compose(UiMode::Loading, &self.catalog.page(page), &label, &self.theme);
                self.present(&screen);
            }
            thread::sleep(self.settings.loading_poll);
        }
    }

    fn present(&mut self, screen: &Screen) {
        if let Err(e) = self.surface.present(screen) {
            tracing::warn!(error = %e, "frame dropped");
        }
    }
}

/// Spawns a [`Renderer`] on a named thread.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_renderer<S: Surface + 'static>(renderer: Renderer<S>) -> std::io::Result<JoinHandle<S>> {
    thread::Builder::new()
        .name("render".to_string())
        .spawn(move || renderer.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Result;
    use crate::ui::layout::Rect;
    use crate::ui::theme::Rgb;
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use std::time::Instant;

    #[derive(Default)]
    struct Recording {
        frames: Arc<Mutex<Vec<Vec<String>>>>,
        current: Vec<String>,
    }

    impl Surface for Recording {
        fn clear(&mut self, _color: Rgb) {
            self.current.clear();
        }
        fn fill_rect(&mut self, _rect: Rect, _color: Rgb) {}
        fn stroke_rect(&mut self, _rect: Rect, _color: Rgb) {}
        fn draw_text(&mut self, _x: u32, _y: u32, text: &str, _fg: Rgb, _bg: Rgb) {
            self.current.push(text.to_string());
        }
        fn flush(&mut self) -> Result<()> {
            self.frames.lock().push(std::mem::take(&mut self.current));
            Ok(())
        }
    }

    fn wait_for(frames: &Mutex<Vec<Vec<String>>>, text: &str) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if frames.lock().iter().any(|f| f.iter().any(|t| t == text)) {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }

    type Frames = Arc<Mutex<Vec<Vec<String>>>>;

    fn start(shared: &Arc<SharedState>) -> (Frames, JoinHandle<Recording>) {
        let catalog = Arc::new(DirectoryCatalog::from_entries(PathBuf::from("/"), Vec::new()));
        let surface = Recording::default();
        let frames = Arc::clone(&surface.frames);
        let settings = RenderSettings {
            frame_interval: Duration::from_millis(1),
            loading_poll: Duration::from_millis(1),
        };
        let handle = spawn_renderer(Renderer::new(
            surface,
            Arc::clone(shared),
            catalog,
            Theme::default(),
            settings,
        ))
        .unwrap();
        (frames, handle)
    }

    fn is_loading_frame(frame: &[String]) -> bool {
        frame.first().map(String::as_str) == Some("Loading...")
    }

    #[test]
    fn follows_modes_and_ends_with_farewell() {
        let shared = Arc::new(SharedState::new());
        let (frames, handle) = start(&shared);

        assert!(wait_for(&frames, "Initializing..."));
        shared.set_mode(UiMode::Index);
        assert!(wait_for(&frames, "Select a folder"));

        shared.set_label("Jazz");
        shared.set_mode(UiMode::Loading);
        assert!(wait_for(&frames, "Jazz"));
        shared.set_label("Blue in Green");
        assert!(wait_for(&frames, "Blue in Green"));
        shared.clear_label();
        shared.set_mode(UiMode::Index);

        shared.request_exit();
        handle.join().unwrap();

        let frames = frames.lock();
        let last = frames.last().unwrap();
        assert_eq!(last[0], "Done. Please wait for GUI restart...");
        let sentinel_progress = frames
            .iter()
            .filter(|f| is_loading_frame(f))
            .filter(|f| f.iter().any(|t| t == crate::app::SENTINEL_LABEL))
            .count();
        assert_eq!(sentinel_progress, 0);
    }

    #[test]
    fn loading_entered_after_the_run_ended_draws_no_progress() {
        let shared = Arc::new(SharedState::new());
        let (frames, handle) = start(&shared);
        assert!(wait_for(&frames, "Initializing..."));

        shared.set_mode(UiMode::Loading);
        thread::sleep(Duration::from_millis(30));
        shared.set_mode(UiMode::Index);
        assert!(wait_for(&frames, "Select a folder"));

        shared.request_exit();
        handle.join().unwrap();
        assert!(!frames.lock().iter().any(|f| is_loading_frame(f)));
    }
}
