use std::io::{BufWriter, Write};

use ::image::imageops::FilterType;
use ::image::{DynamicImage, Rgba, RgbImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef,
    Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Polygon, Px, Rgb,
};

use super::{Color, Surface, TextStyle};
use crate::error::{ReportError, Result};
use crate::geometry::{to_pdf_y, Rect, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::metrics::FontWeight;

/// Line segments used per rounded corner
const CORNER_SEGMENTS: usize = 6;

/// printpdf-backed surface using the built-in Helvetica family.
pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font_regular: IndirectFontRef,
    font_bold: IndirectFontRef,
    max_image_px: u32,
}

impl PdfSurface {
    /// Creates a one-page document. Images larger than `max_image_px` on
    /// either side are downscaled before embedding (0 disables this).
    pub fn new(title: &str, max_image_px: u32) -> Result<Self> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

        let layer = doc.get_page(page1).get_layer(layer1);

        let font_regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::PdfError(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::PdfError(e.to_string()))?;

        Ok(PdfSurface {
            doc,
            layer,
            font_regular,
            font_bold,
            max_image_px,
        })
    }

    /// Serialises the finished document.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            let mut writer = BufWriter::new(&mut bytes);
            self.doc
                .save(&mut writer)
                .map_err(|e| ReportError::PdfError(e.to_string()))?;
            writer.flush()?;
        }
        Ok(bytes)
    }

    fn font(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.font_regular,
            FontWeight::Bold => &self.font_bold,
        }
    }

    fn downscaled<'a>(&self, image: &'a DynamicImage) -> std::borrow::Cow<'a, DynamicImage> {
        let limit = self.max_image_px;
        if limit > 0 && (image.width() > limit || image.height() > limit) {
            std::borrow::Cow::Owned(image.resize(limit, limit, FilterType::Triangle))
        } else {
            std::borrow::Cow::Borrowed(image)
        }
    }
}

impl Surface for PdfSurface {
    fn add_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.layer.set_fill_color(pdf_color(style.color));
        self.layer.use_text(
            text,
            style.size,
            Mm(x),
            Mm(to_pdf_y(y)),
            self.font(style.weight),
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.layer.set_fill_color(pdf_color(color));
        let points = vec![
            point(rect.x, rect.y),
            point(rect.right(), rect.y),
            point(rect.right(), rect.bottom()),
            point(rect.x, rect.bottom()),
        ];
        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Color, stroke: Color) {
        self.layer.set_fill_color(pdf_color(fill));
        self.layer.set_outline_color(pdf_color(stroke));
        self.layer.set_outline_thickness(0.5);

        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0);
        let pi = std::f32::consts::PI;
        let mut points = Vec::new();

        // Corner centres in layout space, walked clockwise from the top-left.
        // Angles are measured with y pointing down.
        let corners = [
            (rect.x + r, rect.y + r, pi),
            (rect.right() - r, rect.y + r, 1.5 * pi),
            (rect.right() - r, rect.bottom() - r, 0.0),
            (rect.x + r, rect.bottom() - r, 0.5 * pi),
        ];
        for (cx, cy, start) in corners {
            for i in 0..=CORNER_SEGMENTS {
                let angle = start + (i as f32 / CORNER_SEGMENTS as f32) * (pi / 2.0);
                points.push(point(cx + r * angle.cos(), cy + r * angle.sin()));
            }
        }

        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode: PaintMode::FillStroke,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, thickness: f32) {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(thickness);
        draw_line(&self.layer, x1, y1, x2, y2);
    }

    fn image(&mut self, image: &DynamicImage, rect: Rect) {
        let source = self.downscaled(image);
        embed_image(&self.layer, &source, rect);
    }
}

fn pdf_color(color: Color) -> printpdf::Color {
    printpdf::Color::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

fn point(x: f32, y: f32) -> (Point, bool) {
    (Point::new(Mm(x), Mm(to_pdf_y(y))), false)
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let line = Line {
        points: vec![point(x1, y1), point(x2, y2)],
        is_closed: false,
    };
    layer.add_line(line);
}

/// Embeds `image` so that it exactly covers `rect`.
fn embed_image(layer: &PdfLayerReference, image: &DynamicImage, rect: Rect) {
    // Convert to RGBA first to handle transparency
    let rgba_image = image.to_rgba8();
    let (width_px, height_px) = rgba_image.dimensions();

    // Composite against white background
    let mut rgb_image = RgbImage::new(width_px, height_px);
    for (x, y, pixel) in rgba_image.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let bg = 255.0;
        let out_r = (r as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_g = (g as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_b = (b as f32 * alpha + bg * (1.0 - alpha)) as u8;
        rgb_image.put_pixel(x, y, ::image::Rgb([out_r, out_g, out_b]));
    }

    let xobject = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb_image.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // DPI = pixels / (mm / 25.4); the rect already has the image's aspect
    // ratio so one DPI value sizes both axes.
    let dpi = (width_px as f32) / (rect.width / 25.4);

    xobject.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(rect.x)),
            translate_y: Some(Mm(to_pdf_y(rect.bottom()))),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}
