//! The page/document state threaded through every renderer.

use crate::geometry::{BOTTOM_LIMIT_MM, MARGIN_MM};
use crate::metrics::text_width;
use crate::surface::{Surface, TextStyle};

/// A document being composed: the drawing surface plus the write cursor.
///
/// Pages are only ever appended. The cursor is the top-down y position (mm)
/// where the next block starts on the current page.
pub struct Document<S: Surface> {
    surface: S,
    cursor_y: f32,
    page_index: usize,
}

impl<S: Surface> Document<S> {
    /// Wraps a surface that already has its first page.
    pub fn new(surface: S) -> Self {
        Document {
            surface,
            cursor_y: MARGIN_MM,
            page_index: 0,
        }
    }

    /// Breaks the page if a block of `height` would cross the bottom margin.
    ///
    /// Returns `true` when a new page was started.
    ///
    /// Exception: with the cursor already at the top margin nothing is
    /// added and `false` is returned, so a block taller than a whole page is
    /// drawn on the fresh page instead of pushing out another empty one.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor_y + height <= BOTTOM_LIMIT_MM {
            return false;
        }
        if self.cursor_y <= MARGIN_MM {
            log::debug!(
                "Block of {:.1}mm exceeds a full page on page {}",
                height,
                self.page_index + 1
            );
            return false;
        }
        self.break_page();
        true
    }

    /// Starts a new page unconditionally and moves the cursor to its top.
    pub fn break_page(&mut self) {
        self.surface.add_page();
        self.page_index += 1;
        self.cursor_y = MARGIN_MM;
        log::debug!("Started page {}", self.page_index + 1);
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    pub fn set_cursor_y(&mut self, y: f32) {
        self.cursor_y = y;
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor_y += dy;
    }

    /// 0-based index of the page currently being written
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.page_index + 1
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.surface.text(text, x, y, style);
    }

    /// Draws `text` horizontally centred on `center_x`.
    pub fn text_centered(&mut self, text: &str, center_x: f32, y: f32, style: TextStyle) {
        let width = text_width(text, style.size, style.weight);
        self.surface.text(text, center_x - width / 2.0, y, style);
    }
}
