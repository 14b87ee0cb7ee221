//! Several reports in one document, one report per page run.

use chrono::{Datelike, Local, NaiveDate};

use crate::compose::compose_report;
use crate::config::Letterhead;
use crate::document::Document;
use crate::error::{ReportError, Result};
use crate::model::ReportData;
use crate::surface::Surface;

/// Filename used for a bulk export with no month filter
pub const DEFAULT_BULK_FILENAME: &str = "Bulk_Reports.pdf";

/// Composes `reports` in order. Every report after the first starts on a
/// fresh page, so reports never share a page.
pub fn compose_batch<S: Surface>(
    doc: &mut Document<S>,
    reports: &[ReportData],
    letterhead: &Letterhead,
) -> Result<()> {
    if reports.is_empty() {
        return Err(ReportError::NothingToGenerate);
    }

    for (index, report) in reports.iter().enumerate() {
        if index > 0 {
            doc.break_page();
        }
        compose_report(doc, report, letterhead);
    }

    Ok(())
}

/// Calendar month used to pick reports for a bulk export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportMonth {
    year: i32,
    month: u32,
}

impl ReportMonth {
    /// Parses `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|_| ReportError::DateError(s.to_string()))?;
        Ok(ReportMonth {
            year: date.year(),
            month: date.month(),
        })
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        ReportMonth {
            year: today.year(),
            month: today.month(),
        }
    }

    /// `YYYY-MM`
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Whether the report's event date falls in this month. Dates are
    /// matched on their `YYYY-MM` prefix as stored by the report form.
    pub fn contains(&self, report: &ReportData) -> bool {
        report
            .event_date
            .as_deref()
            .is_some_and(|date| date.trim_start().starts_with(&self.label()))
    }

    pub fn bulk_filename(&self) -> String {
        format!("Reports_{}.pdf", self.label())
    }
}
