//! Drawing surfaces.
//!
//! [`Surface`] is the boundary to whatever puts pixels on the panel. Glyph
//! rasterisation and framebuffer access live behind it. [`LogSurface`] is a
//! headless surface that reports each frame's text through `tracing`.

use crate::domain::Result;
use crate::ui::layout::Rect;
use crate::ui::theme::Rgb;
use crate::ui::viewmodel::{Primitive, Screen};

pub trait Surface: Send {
    fn clear(&mut self, color: Rgb);
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
    fn stroke_rect(&mut self, rect: Rect, color: Rgb);
    fn draw_text(&mut self, x: u32, y: u32, text: &str, fg: Rgb, bg: Rgb);

    /// Makes everything drawn since the last flush visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the output device rejects the frame.
    fn flush(&mut self) -> Result<()>;

    /// Draws a whole screen and flushes it.
    ///
    /// # Errors
    ///
    /// Propagates [`Surface::flush`] errors.
    fn present(&mut self, screen: &Screen) -> Result<()> {
        self.clear(screen.background);
        for primitive in &screen.primitives {
            match primitive {
                Primitive::FillRect { rect, color } => self.fill_rect(*rect, *color),
                Primitive::StrokeRect { rect, color } => self.stroke_rect(*rect, *color),
                Primitive::Text { x, y, text, fg, bg } => self.draw_text(*x, *y, text, *fg, *bg),
            }
        }
        self.flush()
    }
}

/// Surface that logs one line per frame.
#[derive(Debug, Default)]
pub struct LogSurface {
    frame: u64,
    lines: Vec<String>,
}

impl LogSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames flushed so far.
    pub const fn frames(&self) -> u64 {
        self.frame
    }
}

impl Surface for LogSurface {
    fn clear(&mut self, _color: Rgb) {
        self.lines.clear();
    }

    fn fill_rect(&mut self, _rect: Rect, _color: Rgb) {}

    fn stroke_rect(&mut self, _rect: Rect, _color: Rgb) {}

    fn draw_text(&mut self, _x: u32, _y: u32, text: &str, _fg: Rgb, _bg: Rgb) {
        self.lines.push(text.to_string());
    }

    fn flush(&mut self) -> Result<()> {
        self.frame += 1;
        tracing::info!(frame = self.frame, text = ?self.lines, "frame");
        self.lines.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::UiMode;
    use crate::catalog::Slot;
    use crate::ui::theme::Theme;
    use crate::ui::viewmodel::compose;

    #[test]
    fn log_surface_counts_frames() {
        let mut surface = LogSurface::new();
        let page = std::array::from_fn(|_| Slot::Placeholder);
        let screen = compose(UiMode::Loading, &page, "Track", &Theme::default());
        surface.present(&screen).unwrap();
        surface.present(&screen).unwrap();
        assert_eq!(surface.frames(), 2);
        assert!(surface.lines.is_empty());
    }
}
