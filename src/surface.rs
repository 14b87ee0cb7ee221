//! Primitive drawing operations.
//!
//! [`Surface`] is the only thing in the crate that touches output. Every
//! coordinate handed to it is in layout space (mm, top-left origin); text is
//! positioned by its baseline.

use ::image::DynamicImage;

use crate::geometry::Rect;
use crate::metrics::FontWeight;

pub mod pdf;
pub mod recording;

pub use pdf::PdfSurface;
pub use recording::{DrawOp, RecordingSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const NAVY: Color = Color::rgb(20, 30, 90);
    pub const BLACK: Color = Color::rgb(30, 30, 30);
    pub const GREY: Color = Color::rgb(100, 100, 100);
    pub const LIGHT_BG: Color = Color::rgb(248, 249, 250);
    pub const RULE: Color = Color::rgb(220, 220, 220);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
}

impl TextStyle {
    pub const fn regular(size: f32, color: Color) -> Self {
        TextStyle { size, weight: FontWeight::Regular, color }
    }

    pub const fn bold(size: f32, color: Color) -> Self {
        TextStyle { size, weight: FontWeight::Bold, color }
    }
}

pub trait Surface {
    /// Starts a new page; subsequent operations land on it.
    fn add_page(&mut self);

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Color, stroke: Color);

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, thickness: f32);

    /// Draws an already decoded image stretched to `rect`. Callers are
    /// responsible for keeping `rect` at the image's aspect ratio.
    fn image(&mut self, image: &DynamicImage, rect: Rect);
}
