use ::image::DynamicImage;

use super::{Color, Surface, TextStyle};
use crate::geometry::Rect;

/// One primitive call, tagged with the 0-based page it landed on.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        page: usize,
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    FillRect {
        page: usize,
        rect: Rect,
        color: Color,
    },
    RoundedRect {
        page: usize,
        rect: Rect,
        radius: f32,
        fill: Color,
        stroke: Color,
    },
    Line {
        page: usize,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
    },
    Image {
        page: usize,
        rect: Rect,
        width_px: u32,
        height_px: u32,
    },
}

impl DrawOp {
    pub fn page(&self) -> usize {
        match self {
            DrawOp::Text { page, .. }
            | DrawOp::FillRect { page, .. }
            | DrawOp::RoundedRect { page, .. }
            | DrawOp::Line { page, .. }
            | DrawOp::Image { page, .. } => *page,
        }
    }
}

/// Surface that keeps a log of every drawing call instead of producing a file.
#[derive(Debug)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    pages: usize,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        RecordingSurface {
            ops: Vec::new(),
            pages: 1,
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Text runs in drawing order as `(page, text, baseline y)`.
    pub fn texts(&self) -> impl Iterator<Item = (usize, &str, f32)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { page, text, y, .. } => Some((*page, text.as_str(), *y)),
            _ => None,
        })
    }

    /// Placed images as `(page, rect)`.
    pub fn images(&self) -> impl Iterator<Item = (usize, Rect)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image { page, rect, .. } => Some((*page, *rect)),
            _ => None,
        })
    }

    /// First text run equal to `needle`.
    pub fn find_text(&self, needle: &str) -> Option<(usize, f32)> {
        self.texts()
            .find(|(_, text, _)| *text == needle)
            .map(|(page, _, y)| (page, y))
    }

    fn current_page(&self) -> usize {
        self.pages - 1
    }
}

impl Surface for RecordingSurface {
    fn add_page(&mut self) {
        self.pages += 1;
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            page: self.current_page(),
            text: text.to_string(),
            x,
            y,
            style,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect {
            page: self.current_page(),
            rect,
            color,
        });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Color, stroke: Color) {
        self.ops.push(DrawOp::RoundedRect {
            page: self.current_page(),
            rect,
            radius,
            fill,
            stroke,
        });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, _thickness: f32) {
        self.ops.push(DrawOp::Line {
            page: self.current_page(),
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }

    fn image(&mut self, image: &DynamicImage, rect: Rect) {
        self.ops.push(DrawOp::Image {
            page: self.current_page(),
            rect,
            width_px: image.width(),
            height_px: image.height(),
        });
    }
}
