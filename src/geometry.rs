//! Page geometry shared by every page of a document.
//!
//! All layout happens in millimetres on an A4 portrait page with the origin at
//! the top-left corner and y growing downward. Only the PDF surface converts
//! to PDF's bottom-left origin, through [`to_pdf_y`].

// ============================================================================
// Page
// ============================================================================

/// A4 dimensions in mm
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Margin on all four sides
pub const MARGIN_MM: f32 = 20.0;

/// Usable horizontal drawing area
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

/// Lowest y a block may reach before a page break is needed
pub const BOTTOM_LIMIT_MM: f32 = PAGE_HEIGHT_MM - MARGIN_MM;

// ============================================================================
// Blocks
// ============================================================================

pub const ROW_HEIGHT_MM: f32 = 8.0;
pub const LINE_HEIGHT_MM: f32 = 5.0;
pub const BLOCK_SPACING_MM: f32 = 8.0;

/// Space reserved for a table title, of which only the first part is advanced
/// before the header row starts.
pub const TABLE_TITLE_HEIGHT_MM: f32 = 10.0;
pub const TABLE_TITLE_ADVANCE_MM: f32 = 6.0;

/// Cell text inset from the column's left edge, and baseline from the row top
pub const CELL_INSET_MM: f32 = 2.0;
pub const CELL_BASELINE_MM: f32 = 5.5;

pub const SECTION_LABEL_RESERVE_MM: f32 = 15.0;
pub const SECTION_LABEL_ADVANCE_MM: f32 = 6.0;

pub const LOGO_SIZE_MM: f32 = 25.0;
pub const LOGO_GAP_MM: f32 = 5.0;

pub const STAT_CARD_HEIGHT_MM: f32 = 22.0;
pub const STAT_CARD_RESERVE_MM: f32 = 40.0;
pub const STAT_CARD_ADVANCE_MM: f32 = 35.0;
pub const STAT_CARD_RADIUS_MM: f32 = 2.0;

pub const META_ROW_HEIGHT_MM: f32 = 12.0;

pub const POSTER_WIDTH_RATIO: f32 = 0.35;
pub const POSTER_MAX_HEIGHT_MM: f32 = 80.0;

pub const GALLERY_BOX_HEIGHT_MM: f32 = 50.0;
pub const GALLERY_GAP_MM: f32 = 5.0;
pub const GALLERY_MAX_IMAGES: usize = 3;

/// Gap left below a poster or gallery
pub const IMAGE_TRAILING_GAP_MM: f32 = 10.0;

/// Points per millimetre, for converting font sizes into layout units
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Converts a top-down layout y into PDF's bottom-up coordinate.
pub fn to_pdf_y(y: f32) -> f32 {
    PAGE_HEIGHT_MM - y
}

/// An axis-aligned box in layout coordinates; `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}
