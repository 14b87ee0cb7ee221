//! Block renderers built on the drawing primitives.
//!
//! Every renderer reserves its full height through
//! [`Document::ensure_space`] before drawing. Tables and images are atomic;
//! body text is checked line by line and so can flow across pages.

use crate::document::Document;
use crate::geometry::*;
use crate::media::{place, ImageData, Placement};
use crate::metrics::{wrap_text, FontWeight};
use crate::surface::{Color, Surface, TextStyle};

const LABEL_STYLE: TextStyle = TextStyle::bold(10.0, Color::NAVY);
const BODY_STYLE: TextStyle = TextStyle::regular(10.0, Color::BLACK);
const HEADER_CELL_STYLE: TextStyle = TextStyle::bold(9.0, Color::WHITE);
const CELL_STYLE: TextStyle = TextStyle::regular(9.0, Color::BLACK);
const STAT_LABEL_STYLE: TextStyle = TextStyle::bold(7.0, Color::NAVY);
const STAT_VALUE_STYLE: TextStyle = TextStyle::bold(11.0, Color::BLACK);

/// Row separator thickness in points
const RULE_THICKNESS: f32 = 0.2;

// ============================================================================
// Text
// ============================================================================

/// Uppercased navy heading at the left margin.
pub fn section_label<S: Surface>(doc: &mut Document<S>, label: &str) {
    doc.ensure_space(SECTION_LABEL_RESERVE_MM);
    let y = doc.cursor_y();
    doc.text(&label.to_uppercase(), MARGIN_MM, y, LABEL_STYLE);
    doc.advance(SECTION_LABEL_ADVANCE_MM);
}

/// Word-wrapped paragraph text; may continue onto following pages.
pub fn body_text<S: Surface>(doc: &mut Document<S>, text: &str) {
    if text.trim().is_empty() {
        return;
    }

    let lines = wrap_text(text, CONTENT_WIDTH_MM, BODY_STYLE.size, FontWeight::Regular);
    for line in &lines {
        doc.ensure_space(LINE_HEIGHT_MM);
        if !line.is_empty() {
            let y = doc.cursor_y();
            doc.text(line, MARGIN_MM, y, BODY_STYLE);
        }
        doc.advance(LINE_HEIGHT_MM);
    }
    doc.advance(BLOCK_SPACING_MM);
}

// ============================================================================
// Tables
// ============================================================================

/// Height reserved for a table with `rows` data rows, title included.
pub fn table_height(rows: usize) -> f32 {
    (rows as f32 + 1.0) * ROW_HEIGHT_MM + TABLE_TITLE_HEIGHT_MM
}

/// Titled table with a filled header row and zebra-striped body.
///
/// `widths` gives each column's width and should add up to the content
/// width; cells past the last width are not drawn. The table is never split
/// across pages.
pub fn smart_table<S: Surface>(
    doc: &mut Document<S>,
    title: &str,
    headers: &[&str],
    rows: &[Vec<String>],
    widths: &[f32],
) {
    if rows.is_empty() {
        return;
    }

    let block_height = table_height(rows.len());
    doc.ensure_space(block_height);

    let top = doc.cursor_y();
    let offsets = column_offsets(widths);

    doc.text(&title.to_uppercase(), MARGIN_MM, top, LABEL_STYLE);

    // Header
    let header_y = top + TABLE_TITLE_ADVANCE_MM;
    doc.surface_mut().fill_rect(
        Rect::new(MARGIN_MM, header_y, CONTENT_WIDTH_MM, ROW_HEIGHT_MM),
        Color::NAVY,
    );
    for (header, x) in headers.iter().zip(&offsets) {
        doc.text(header, x + CELL_INSET_MM, header_y + CELL_BASELINE_MM, HEADER_CELL_STYLE);
    }

    // Rows
    for (index, row) in rows.iter().enumerate() {
        let row_y = header_y + ROW_HEIGHT_MM * (index as f32 + 1.0);
        let surface = doc.surface_mut();

        if index % 2 == 1 {
            surface.fill_rect(
                Rect::new(MARGIN_MM, row_y, CONTENT_WIDTH_MM, ROW_HEIGHT_MM),
                Color::LIGHT_BG,
            );
        }
        surface.line(
            MARGIN_MM,
            row_y + ROW_HEIGHT_MM,
            PAGE_WIDTH_MM - MARGIN_MM,
            row_y + ROW_HEIGHT_MM,
            Color::RULE,
            RULE_THICKNESS,
        );

        for (cell, x) in row.iter().zip(&offsets) {
            doc.text(cell, x + CELL_INSET_MM, row_y + CELL_BASELINE_MM, CELL_STYLE);
        }
    }

    doc.set_cursor_y(top + block_height + BLOCK_SPACING_MM);
}

/// Left edge of each column.
fn column_offsets(widths: &[f32]) -> Vec<f32> {
    widths
        .iter()
        .scan(MARGIN_MM, |x, width| {
            let left = *x;
            *x += width;
            Some(left)
        })
        .collect()
}

// ============================================================================
// Images
// ============================================================================

/// Decodes `image` and draws it aspect-fit inside `frame`.
///
/// Failures are logged and swallowed; the caller's layout does not change
/// either way. Returns the drawn rectangle on success.
pub fn place_image<S: Surface>(
    doc: &mut Document<S>,
    image: &ImageData,
    frame: Rect,
    placement: Placement,
    section: &str,
) -> Option<Rect> {
    let decoded = match image.decode() {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!(
                "Skipping {} image on page {}: {}",
                section,
                doc.page_count(),
                e
            );
            return None;
        }
    };

    let Some(rect) = place((decoded.width(), decoded.height()), frame, placement) else {
        log::warn!("Skipping empty {} image on page {}", section, doc.page_count());
        return None;
    };

    doc.surface_mut().image(&decoded, rect);
    Some(rect)
}

/// Row of square logo boxes centred on the page.
pub fn logo_strip<S: Surface>(doc: &mut Document<S>, logos: &[&ImageData]) {
    if logos.is_empty() {
        return;
    }

    doc.ensure_space(LOGO_SIZE_MM + LOGO_GAP_MM);

    let count = logos.len() as f32;
    let strip_width = count * LOGO_SIZE_MM + (count - 1.0) * LOGO_GAP_MM;
    let mut x = (PAGE_WIDTH_MM - strip_width) / 2.0;
    let y = doc.cursor_y();

    for logo in logos {
        let frame = Rect::new(x, y, LOGO_SIZE_MM, LOGO_SIZE_MM);
        place_image(doc, logo, frame, Placement::Centered, "logo");
        x += LOGO_SIZE_MM + LOGO_GAP_MM;
    }

    doc.advance(LOGO_SIZE_MM + LOGO_GAP_MM);
}

/// Labelled poster, left aligned and capped in width and height.
pub fn poster<S: Surface>(doc: &mut Document<S>, title: &str, image: &ImageData) {
    doc.ensure_space(SECTION_LABEL_ADVANCE_MM + POSTER_MAX_HEIGHT_MM);
    section_label(doc, title);

    let frame = Rect::new(
        MARGIN_MM,
        doc.cursor_y(),
        CONTENT_WIDTH_MM * POSTER_WIDTH_RATIO,
        POSTER_MAX_HEIGHT_MM,
    );
    if let Some(drawn) = place_image(doc, image, frame, Placement::TopLeft, "poster") {
        doc.advance(drawn.height + IMAGE_TRAILING_GAP_MM);
    }
    doc.advance(IMAGE_TRAILING_GAP_MM);
}

/// Equal-width boxes across the content width, one per image.
///
/// Only the first [`GALLERY_MAX_IMAGES`] images are laid out. A box whose
/// image fails to decode stays empty; its neighbours keep their positions.
pub fn gallery<S: Surface>(doc: &mut Document<S>, title: &str, images: &[ImageData]) {
    if images.is_empty() {
        return;
    }
    if images.len() > GALLERY_MAX_IMAGES {
        log::warn!(
            "Gallery has {} images, only the first {} are shown",
            images.len(),
            GALLERY_MAX_IMAGES
        );
    }
    let shown = &images[..images.len().min(GALLERY_MAX_IMAGES)];

    doc.ensure_space(SECTION_LABEL_ADVANCE_MM + GALLERY_BOX_HEIGHT_MM);
    section_label(doc, title);

    let count = shown.len() as f32;
    let box_width = (CONTENT_WIDTH_MM - GALLERY_GAP_MM * (count - 1.0)) / count;
    let y = doc.cursor_y();

    for (index, image) in shown.iter().enumerate() {
        let x = MARGIN_MM + index as f32 * (box_width + GALLERY_GAP_MM);
        let frame = Rect::new(x, y, box_width, GALLERY_BOX_HEIGHT_MM);
        place_image(doc, image, frame, Placement::Centered, "gallery");
    }

    doc.advance(GALLERY_BOX_HEIGHT_MM + IMAGE_TRAILING_GAP_MM);
}

// ============================================================================
// Stat card
// ============================================================================

/// Rounded card split into equal columns, each a small label over a value.
pub fn stat_card<S: Surface>(doc: &mut Document<S>, title: &str, stats: &[(&str, String)]) {
    if stats.is_empty() {
        return;
    }

    doc.ensure_space(STAT_CARD_RESERVE_MM);
    section_label(doc, title);

    let y = doc.cursor_y();
    doc.surface_mut().rounded_rect(
        Rect::new(MARGIN_MM, y, CONTENT_WIDTH_MM, STAT_CARD_HEIGHT_MM),
        STAT_CARD_RADIUS_MM,
        Color::LIGHT_BG,
        Color::RULE,
    );

    let column_width = CONTENT_WIDTH_MM / stats.len() as f32;
    for (index, (label, value)) in stats.iter().enumerate() {
        let center_x = MARGIN_MM + index as f32 * column_width + column_width / 2.0;
        doc.text_centered(label, center_x, y + 7.0, STAT_LABEL_STYLE);
        doc.text_centered(value, center_x, y + 13.0, STAT_VALUE_STYLE);
    }

    doc.advance(STAT_CARD_ADVANCE_MM);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ImageKind;
    use crate::surface::{DrawOp, RecordingSurface};
    use ::image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png(w: u32, h: u32) -> ImageData {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(w, h, Rgb([200, 10, 10])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        ImageData::new(ImageKind::Png, out.into_inner())
    }

    fn corrupt() -> ImageData {
        ImageData::new(ImageKind::Jpeg, vec![0xFF, 0xD8, 0x00, 0x01])
    }

    fn rows(n: usize) -> Vec<Vec<String>> {
        (0..n).map(|i| vec![format!("item {}", i), "10".to_string()]).collect()
    }

    #[test]
    fn body_text_flows_across_pages() {
        let mut doc = Document::new(RecordingSurface::new());
        doc.set_cursor_y(260.0);
        let text = (0..10).map(|i| format!("line{}", i)).collect::<Vec<_>>().join("\n");
        body_text(&mut doc, &text);

        let surface = doc.into_surface();
        assert_eq!(surface.page_count(), 2);
        let texts: Vec<_> = surface.texts().collect();
        assert_eq!(texts.len(), 10);
        assert_eq!(texts.iter().filter(|(page, _, _)| *page == 0).count(), 3);
        assert_eq!(texts[3], (1, "line3", MARGIN_MM));
        for (_, _, y) in texts {
            assert!(y + LINE_HEIGHT_MM <= BOTTOM_LIMIT_MM);
        }
    }

    #[test]
    fn body_text_advances_by_lines_and_spacing() {
        let mut doc = Document::new(RecordingSurface::new());
        body_text(&mut doc, "one\ntwo");
        assert_eq!(doc.cursor_y(), MARGIN_MM + 2.0 * LINE_HEIGHT_MM + BLOCK_SPACING_MM);
    }

    #[test]
    fn empty_body_text_draws_nothing() {
        let mut doc = Document::new(RecordingSurface::new());
        body_text(&mut doc, "   ");
        assert_eq!(doc.cursor_y(), MARGIN_MM);
        assert!(doc.into_surface().ops().is_empty());
    }

    #[test]
    fn table_moves_whole_to_next_page() {
        let mut doc = Document::new(RecordingSurface::new());
        doc.set_cursor_y(250.0);
        smart_table(&mut doc, "Income", &["SOURCE", "AMOUNT"], &rows(3), &[119.0, 51.0]);

        let surface = doc.into_surface();
        assert_eq!(surface.page_count(), 2);
        assert!(surface.ops().iter().all(|op| op.page() == 1));
        assert_eq!(surface.find_text("INCOME"), Some((1, MARGIN_MM)));
    }

    #[test]
    fn table_fits_in_place_and_advances() {
        let mut doc = Document::new(RecordingSurface::new());
        smart_table(&mut doc, "Expense", &["PURPOSE", "AMOUNT"], &rows(2), &[119.0, 51.0]);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.cursor_y(), MARGIN_MM + table_height(2) + BLOCK_SPACING_MM);
    }

    #[test]
    fn table_stripes_odd_rows_and_rules_every_row() {
        let mut doc = Document::new(RecordingSurface::new());
        smart_table(&mut doc, "T", &["A", "B"], &rows(4), &[119.0, 51.0]);
        let surface = doc.into_surface();

        let fills: Vec<_> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, color, .. } => Some((rect.y, *color)),
                _ => None,
            })
            .collect();
        let header_y = MARGIN_MM + TABLE_TITLE_ADVANCE_MM;
        assert_eq!(
            fills,
            vec![
                (header_y, Color::NAVY),
                (header_y + 2.0 * ROW_HEIGHT_MM, Color::LIGHT_BG),
                (header_y + 4.0 * ROW_HEIGHT_MM, Color::LIGHT_BG),
            ]
        );

        let lines = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .count();
        assert_eq!(lines, 4);
    }

    #[test]
    fn table_cells_follow_column_offsets() {
        let mut doc = Document::new(RecordingSurface::new());
        let widths = [10.0, 68.0, 92.0];
        let data = vec![vec!["1".to_string(), "Asha".to_string(), "RAC Unique".to_string()]];
        smart_table(&mut doc, "Rotaractors", &["#", "NAME", "CLUB"], &data, &widths);

        let xs: Vec<f32> = doc
            .into_surface()
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, x, .. } if text == "Asha" || text == "RAC Unique" => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![MARGIN_MM + 10.0 + CELL_INSET_MM, MARGIN_MM + 78.0 + CELL_INSET_MM]);
    }

    #[test]
    fn logo_strip_is_centred() {
        let a = png(10, 10);
        let b = png(20, 10);
        let mut doc = Document::new(RecordingSurface::new());
        logo_strip(&mut doc, &[&a, &b]);
        assert_eq!(doc.cursor_y(), MARGIN_MM + LOGO_SIZE_MM + LOGO_GAP_MM);

        let images: Vec<_> = doc.into_surface().images().collect();
        assert_eq!(images.len(), 2);
        let strip_left = (PAGE_WIDTH_MM - 55.0) / 2.0;
        assert_eq!(images[0].1, Rect::new(strip_left, MARGIN_MM, 25.0, 25.0));
        // 2:1 logo letterboxed vertically inside its box
        assert_eq!(images[1].1.width, 25.0);
        assert_eq!(images[1].1.height, 12.5);
        assert_eq!(images[1].1.x, strip_left + 30.0);
    }

    #[test]
    fn gallery_keeps_grid_when_an_image_fails() {
        let images = vec![png(40, 30), corrupt(), png(30, 40)];
        let mut doc = Document::new(RecordingSurface::new());
        gallery(&mut doc, "Completion Images", &images);

        let placed: Vec<_> = doc.into_surface().images().map(|(_, r)| r).collect();
        assert_eq!(placed.len(), 2);
        let box_width = (CONTENT_WIDTH_MM - 2.0 * GALLERY_GAP_MM) / 3.0;
        let third_box_x = MARGIN_MM + 2.0 * (box_width + GALLERY_GAP_MM);
        let expected_width = 30.0 * (GALLERY_BOX_HEIGHT_MM / 40.0);
        assert!((placed[1].x - (third_box_x + (box_width - expected_width) / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn gallery_caps_image_count() {
        let images = vec![png(10, 10), png(10, 10), png(10, 10), png(10, 10)];
        let mut doc = Document::new(RecordingSurface::new());
        gallery(&mut doc, "Completion Images", &images);
        assert_eq!(doc.into_surface().images().count(), GALLERY_MAX_IMAGES);
    }

    #[test]
    fn failed_poster_only_adds_trailing_gap() {
        let mut doc = Document::new(RecordingSurface::new());
        poster(&mut doc, "Project Poster", &corrupt());
        assert_eq!(
            doc.cursor_y(),
            MARGIN_MM + SECTION_LABEL_ADVANCE_MM + IMAGE_TRAILING_GAP_MM
        );
        assert_eq!(doc.into_surface().images().count(), 0);
    }

    #[test]
    fn poster_is_left_aligned() {
        let mut doc = Document::new(RecordingSurface::new());
        poster(&mut doc, "Project Poster", &png(100, 200));
        let (_, rect) = doc.into_surface().images().next().unwrap();
        assert_eq!(rect.x, MARGIN_MM);
        assert_eq!(rect.height, 80.0);
        assert_eq!(rect.width, 40.0);
    }

    #[test]
    fn stat_card_centres_each_column() {
        let mut doc = Document::new(RecordingSurface::new());
        let stats = [("A", "1".to_string()), ("B", "2".to_string())];
        stat_card(&mut doc, "Attendance Summary", &stats);

        let surface = doc.into_surface();
        assert!(surface
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::RoundedRect { .. })));
        let x = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { text, x, style, .. } if text == "2" => {
                    Some(*x + crate::metrics::text_width("2", style.size, style.weight) / 2.0)
                }
                _ => None,
            })
            .unwrap();
        assert!((x - (MARGIN_MM + 0.75 * CONTENT_WIDTH_MM)).abs() < 1e-3);
    }
}
