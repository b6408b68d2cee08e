//! Screen geometry and touch hit-testing for the 360x480 panel.
//!
//! ```text
//!   0 ┌──────────────────────────────┐
//!     │ title                        │
//! 125 ├──────────────────────────────┤
//!     │ row 0 .. row 4 (50 px each)  │
//! 375 ├──────────────────────────────┤
//! 430 ├────────┬─────────┬───────────┤
//!     │ left   │ middle  │     │exit │
//! 480 └────────┴─────────┴─────┴─────┘
//!     0       140 150   290   310   360
//! ```
//!
//! Boundaries are deliberately uneven: the exit corner starts strictly below
//! 430, the button row at 430 inclusive.

use crate::catalog::PAGE_SIZE;

pub const SCREEN_WIDTH: u32 = 360;
pub const SCREEN_HEIGHT: u32 = 480;

pub const LIST_TOP: u32 = 125;
pub const LIST_BOTTOM: u32 = 375;
pub const ROW_HEIGHT: u32 = 50;

pub const BUTTON_TOP: u32 = 430;
pub const LEFT_BUTTON_RIGHT: u32 = 140;
pub const MIDDLE_BUTTON_LEFT: u32 = 150;
pub const MIDDLE_BUTTON_RIGHT: u32 = 290;
pub const EXIT_LEFT: u32 = 310;

/// A completed touch sample in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchPoint {
    pub x: u32,
    pub y: u32,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in panel pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// What a touch on the index screen landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTarget {
    PreviousPage,
    NextPage,
    /// Zero-based row of the visible page.
    Row(usize),
    Exit,
}

/// What a touch on the confirm screen landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmTarget {
    Yes,
    No,
}

const fn in_button_row(point: TouchPoint) -> bool {
    point.y >= BUTTON_TOP
}

const fn in_left_button(point: TouchPoint) -> bool {
    in_button_row(point) && point.x < LEFT_BUTTON_RIGHT
}

const fn in_middle_button(point: TouchPoint) -> bool {
    in_button_row(point) && point.x > MIDDLE_BUTTON_LEFT && point.x < MIDDLE_BUTTON_RIGHT
}

/// Hit-tests a touch on the index screen.
///
/// Page availability is not checked here; the state machine decides whether a
/// flip is possible.
#[must_use]
pub fn index_target(point: TouchPoint) -> Option<IndexTarget> {
    if in_middle_button(point) {
        return Some(IndexTarget::NextPage);
    }
    if in_left_button(point) {
        return Some(IndexTarget::PreviousPage);
    }
    if (LIST_TOP..LIST_BOTTOM).contains(&point.y) {
        let row = ((point.y - LIST_TOP) / ROW_HEIGHT) as usize;
        return Some(IndexTarget::Row(row));
    }
    if point.y > BUTTON_TOP && point.x > EXIT_LEFT {
        return Some(IndexTarget::Exit);
    }
    None
}

/// Hit-tests a touch on the confirm screen.
#[must_use]
pub fn confirm_target(point: TouchPoint) -> Option<ConfirmTarget> {
    if in_left_button(point) {
        Some(ConfirmTarget::Yes)
    } else if in_middle_button(point) {
        Some(ConfirmTarget::No)
    } else {
        None
    }
}

/// Frame of the list row `row`.
#[must_use]
pub const fn row_rect(row: usize) -> Rect {
    Rect::new(5, LIST_TOP + ROW_HEIGHT * row as u32, SCREEN_WIDTH - 10, ROW_HEIGHT)
}

/// Frames of every list row, top to bottom.
#[must_use]
pub fn row_rects() -> [Rect; PAGE_SIZE] {
    std::array::from_fn(row_rect)
}

pub const TITLE_RECT: Rect = Rect::new(0, 40, SCREEN_WIDTH, 60);
pub const LEFT_BUTTON: Rect = Rect::new(0, BUTTON_TOP, LEFT_BUTTON_RIGHT, SCREEN_HEIGHT - BUTTON_TOP);
pub const MIDDLE_BUTTON: Rect = Rect::new(
    MIDDLE_BUTTON_LEFT,
    BUTTON_TOP,
    MIDDLE_BUTTON_RIGHT - MIDDLE_BUTTON_LEFT,
    SCREEN_HEIGHT - BUTTON_TOP,
);
pub const EXIT_BUTTON: Rect = Rect::new(EXIT_LEFT, BUTTON_TOP, SCREEN_WIDTH - EXIT_LEFT, SCREEN_HEIGHT - BUTTON_TOP);
pub const FULL_SCREEN: Rect = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: u32, y: u32) -> TouchPoint {
        TouchPoint::new(x, y)
    }

    #[test]
    fn index_rows_split_every_fifty_pixels() {
        assert_eq!(index_target(at(180, 125)), Some(IndexTarget::Row(0)));
        assert_eq!(index_target(at(180, 174)), Some(IndexTarget::Row(0)));
        assert_eq!(index_target(at(180, 175)), Some(IndexTarget::Row(1)));
        assert_eq!(index_target(at(180, 374)), Some(IndexTarget::Row(4)));
        assert_eq!(index_target(at(180, 375)), None);
        assert_eq!(index_target(at(180, 124)), None);
    }

    #[test]
    fn index_buttons() {
        assert_eq!(index_target(at(200, 430)), Some(IndexTarget::NextPage));
        assert_eq!(index_target(at(150, 450)), None);
        assert_eq!(index_target(at(139, 430)), Some(IndexTarget::PreviousPage));
        assert_eq!(index_target(at(140, 450)), None);
        assert_eq!(index_target(at(320, 431)), Some(IndexTarget::Exit));
        assert_eq!(index_target(at(320, 430)), None);
        assert_eq!(index_target(at(300, 460)), None);
    }

    #[test]
    fn confirm_buttons() {
        assert_eq!(confirm_target(at(50, 440)), Some(ConfirmTarget::Yes));
        assert_eq!(confirm_target(at(200, 440)), Some(ConfirmTarget::No));
        assert_eq!(confirm_target(at(200, 200)), None);
        assert_eq!(confirm_target(at(330, 470)), None);
    }

    #[test]
    fn rows_stack_inside_the_list_band() {
        let rows = row_rects();
        assert_eq!(rows[0].y, LIST_TOP);
        assert_eq!(rows[4].y + rows[4].height, LIST_BOTTOM);
    }
}
