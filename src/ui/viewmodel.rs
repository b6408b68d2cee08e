//! View model types representing one drawable screen.
//!
//! A [`Screen`] is a flat list of drawing primitives composed from the current
//! mode, the visible page and the loading label. It contains no logic; the
//! renderer hands it to a [`Surface`](crate::ui::Surface) as-is.
//!
//! # Example
//!
//! ```
//! use tagsync::app::UiMode;
//! use tagsync::catalog::Slot;
//! use tagsync::ui::{compose, Theme};
//!
//! let page = std::array::from_fn(|_| Slot::Placeholder);
//! let screen = compose(UiMode::Index, &page, "", &Theme::default());
//! assert!(screen.texts().any(|text| text == "Next"));
//! ```

use crate::app::UiMode;
use crate::catalog::Page;
use crate::ui::layout::{self, Rect};
use crate::ui::theme::{Rgb, Theme};

/// One drawing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    FillRect { rect: Rect, color: Rgb },
    StrokeRect { rect: Rect, color: Rgb },
    Text { x: u32, y: u32, text: String, fg: Rgb, bg: Rgb },
}

/// A complete frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub background: Rgb,
    pub primitives: Vec<Primitive>,
}

impl Screen {
    fn new(background: Rgb) -> Self {
        Self {
            background,
            primitives: Vec::new(),
        }
    }

    fn text(&mut self, x: u32, y: u32, text: impl Into<String>, fg: Rgb) {
        let bg = self.background;
        self.primitives.push(Primitive::Text {
            x,
            y,
            text: text.into(),
            fg,
            bg,
        });
    }

    fn button(&mut self, rect: Rect, caption: &str, theme: &Theme) {
        self.primitives.push(Primitive::FillRect {
            rect,
            color: theme.button_bg(),
        });
        self.primitives.push(Primitive::Text {
            x: rect.x + 10,
            y: rect.y + 30,
            text: caption.to_string(),
            fg: theme.button_text(),
            bg: theme.button_bg(),
        });
    }

    /// Every text drawn on this screen, top to bottom in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Composes the screen for `mode`.
#[must_use]
pub fn compose(mode: UiMode, page: &Page, label: &str, theme: &Theme) -> Screen {
    let mut screen = Screen::new(theme.background());
    match mode {
        UiMode::Index => {
            screen.text(15, 50, "Select a folder", theme.text());
            for (slot, rect) in page.iter().zip(layout::row_rects()) {
                screen.primitives.push(Primitive::StrokeRect {
                    rect,
                    color: theme.list_border(),
                });
                screen.text(rect.x + 5, rect.y + 31, slot.display_text(), theme.list_text());
            }
            screen.button(layout::LEFT_BUTTON, "Prev", theme);
            screen.button(layout::MIDDLE_BUTTON, "Next", theme);
            screen.button(layout::EXIT_BUTTON, "Exit", theme);
        }
        UiMode::Confirm => {
            screen.text(15, 50, "Update this", theme.text());
            screen.text(15, 122, "directory?", theme.text());
            screen.text(15, 250, label, theme.text());
            screen.button(layout::LEFT_BUTTON, "Yes", theme);
            screen.button(layout::MIDDLE_BUTTON, "No", theme);
        }
        UiMode::Loading => {
            screen.text(15, 50, "Loading...", theme.text());
            screen.text(15, 250, label, theme.text());
        }
        UiMode::LoadingDirectories => {
            screen.text(10, 10, "Loading directories...", theme.text());
        }
        UiMode::Initializing => {
            screen.text(10, 10, "Initializing...", theme.text());
        }
    }
    screen
}

/// Screen left on the panel after every actor has stopped.
#[must_use]
pub fn compose_farewell(theme: &Theme) -> Screen {
    let mut screen = Screen::new(theme.farewell_bg());
    screen.primitives.push(Primitive::FillRect {
        rect: layout::FULL_SCREEN,
        color: theme.farewell_bg(),
    });
    screen.text(10, 10, "Done. Please wait for GUI restart...", theme.text());
    screen.text(10, 40, "You may want to restart the device.", theme.text());
    screen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DirectoryEntry, Slot, PLACEHOLDER_TEXT};
    use chrono::Utc;

    fn page_with(names: &[&str]) -> Page {
        let mut names = names.iter();
        std::array::from_fn(|_| {
            names.next().map_or(Slot::Placeholder, |name| {
                Slot::Directory(DirectoryEntry {
                    relative_path: (*name).to_string(),
                    modified_at: Utc::now(),
                })
            })
        })
    }

    #[test]
    fn index_lists_five_rows_with_placeholders() {
        let screen = compose(UiMode::Index, &page_with(&["Jazz", "Rock"]), "", &Theme::default());
        let texts: Vec<&str> = screen.texts().collect();
        assert_eq!(
            &texts[1..6],
            ["Jazz", "Rock", PLACEHOLDER_TEXT, PLACEHOLDER_TEXT, PLACEHOLDER_TEXT]
        );
        let frames = screen
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::StrokeRect { .. }))
            .count();
        assert_eq!(frames, 5);
    }

    #[test]
    fn confirm_and_loading_show_the_label() {
        let page = page_with(&[]);
        let theme = Theme::default();
        assert!(compose(UiMode::Confirm, &page, "Jazz", &theme).texts().any(|t| t == "Jazz"));
        let loading = compose(UiMode::Loading, &page, "So What", &theme);
        assert_eq!(loading.texts().collect::<Vec<_>>(), ["Loading...", "So What"]);
    }

    #[test]
    fn farewell_is_blue() {
        let screen = compose_farewell(&Theme::default());
        assert_eq!(screen.background, Rgb(0, 0, 255));
    }
}
