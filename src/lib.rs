//! report-pdf: compose paginated event report PDFs
//!
//! A report record ([`ReportData`]) is laid out top to bottom on A4 pages:
//! logo strip, club identity, event title, metadata grid, narrative sections,
//! attendance summary, financial and attendee tables, poster and photo
//! gallery. Blocks that do not fit in the space left on a page move to the
//! next page. Several records can be bundled into one document with each
//! record starting on its own page.
//!
//! Layout runs against the [`Surface`] trait; [`PdfSurface`] writes the PDF
//! and [`RecordingSurface`] keeps a list of draw calls for inspection.

pub mod batch;
pub mod blocks;
pub mod compose;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod media;
pub mod metrics;
pub mod model;
pub mod output;
pub mod surface;

pub use batch::{compose_batch, ReportMonth, DEFAULT_BULK_FILENAME};
pub use compose::compose_report;
pub use config::{EngineConfig, Letterhead};
pub use document::Document;
pub use error::{ReportError, Result};
pub use media::{ImageData, ImageKind};
pub use model::{load_reports, Amount, Attendee, LineItem, ReportData};
pub use output::{deliver, Output, OutputTarget, PreviewStream};
pub use surface::{PdfSurface, RecordingSurface, Surface};

/// Title for a bulk document when the config does not set one
const BULK_TITLE: &str = "Event Reports";

/// Renders one report to PDF bytes.
pub fn render_report(report: &ReportData, config: &EngineConfig) -> Result<Vec<u8>> {
    let title = config
        .document_title
        .clone()
        .or_else(|| report.event_name.clone())
        .unwrap_or_else(|| compose::UNTITLED_EVENT.to_string());

    let surface = PdfSurface::new(&title, config.max_image_px)?;
    let mut doc = Document::new(surface);
    compose_report(&mut doc, report, &config.letterhead);

    let pages = doc.page_count();
    let bytes = doc.into_surface().finish()?;
    log::info!("Rendered '{}': {} page(s), {} bytes", title, pages, bytes.len());
    Ok(bytes)
}

/// Renders `reports` into one PDF, each report starting on a new page.
pub fn render_batch(reports: &[ReportData], config: &EngineConfig) -> Result<Vec<u8>> {
    if reports.is_empty() {
        return Err(ReportError::NothingToGenerate);
    }

    let title = config.document_title.as_deref().unwrap_or(BULK_TITLE);
    let surface = PdfSurface::new(title, config.max_image_px)?;
    let mut doc = Document::new(surface);
    compose_batch(&mut doc, reports, &config.letterhead)?;

    let pages = doc.page_count();
    let bytes = doc.into_surface().finish()?;
    log::info!(
        "Rendered {} report(s): {} page(s), {} bytes",
        reports.len(),
        pages,
        bytes.len()
    );
    Ok(bytes)
}

/// Renders one report and sends it to `target`.
pub fn generate_report(
    report: &ReportData,
    target: &OutputTarget,
    config: &EngineConfig,
) -> Result<Output> {
    let bytes = render_report(report, config)?;
    deliver(bytes, target)
}

/// Renders several reports as one document and sends it to `target`.
pub fn generate_bulk(
    reports: &[ReportData],
    target: &OutputTarget,
    config: &EngineConfig,
) -> Result<Output> {
    let bytes = render_batch(reports, config)?;
    deliver(bytes, target)
}

/// `<eventName>.pdf`, or `Report.pdf` for an unnamed event. Path separators
/// in the name are replaced so the result is always a bare file name.
pub fn default_report_filename(report: &ReportData) -> String {
    let name = report
        .event_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Report");
    let sanitized: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}.pdf", sanitized)
}
