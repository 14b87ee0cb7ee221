//! Lays out one report in its fixed section order.

use crate::blocks::{
    body_text, gallery, logo_strip, poster, section_label, smart_table, stat_card,
};
use crate::config::Letterhead;
use crate::document::Document;
use crate::geometry::*;
use crate::model::{format_number, total_amount, Attendee, LineItem, ReportData};
use crate::surface::{Color, Surface, TextStyle};

/// Printed for metadata values the report leaves blank
pub const PLACEHOLDER: &str = "—";

/// Title used when a report has no event name
pub const UNTITLED_EVENT: &str = "Event Name";

const CURRENCY_PREFIX: &str = "Rs. ";

const CLUB_NAME_STYLE: TextStyle = TextStyle::bold(16.0, Color::NAVY);
const PARENT_CLUB_STYLE: TextStyle = TextStyle::bold(12.0, Color::GREY);
const CLUB_META_STYLE: TextStyle = TextStyle::bold(10.0, Color::BLACK);
const TITLE_STYLE: TextStyle = TextStyle::bold(22.0, Color::NAVY);
const META_LABEL_STYLE: TextStyle = TextStyle::bold(8.0, Color::NAVY);
const META_VALUE_STYLE: TextStyle = TextStyle::regular(10.0, Color::BLACK);

const CLUB_LINE_ADVANCE_MM: f32 = 7.0;
const CLUB_BLOCK_GAP_MM: f32 = 15.0;
const TITLE_ADVANCE_MM: f32 = 15.0;
const META_GRID_GAP_MM: f32 = 15.0;
const META_VALUE_OFFSET_MM: f32 = 5.0;

/// Draws `report` starting at the document's current cursor.
pub fn compose_report<S: Surface>(doc: &mut Document<S>, report: &ReportData, letterhead: &Letterhead) {
    log::debug!(
        "Composing '{}' from page {}",
        report.event_name.as_deref().unwrap_or(UNTITLED_EVENT),
        doc.page_count()
    );

    let logos: Vec<_> = report.present_logos().collect();
    logo_strip(doc, &logos);

    club_identity(doc, report, letterhead);
    event_title(doc, report);
    metadata_grid(doc, report);

    narrative(doc, "Description", report.description.as_deref());

    let stats = [
        ("ROTARACTORS", report.rotaractors.to_string()),
        ("ROTARY MEMBERS", report.rotary.to_string()),
        ("OTHERS", report.others.to_string()),
        ("TOTAL", report.total.to_string()),
    ];
    stat_card(doc, "Attendance Summary", &stats);

    narrative(doc, "Completion Report", report.report.as_deref());
    narrative(doc, "Why This Event", report.why.as_deref());
    narrative(doc, "Impact Of The Event", report.impact.as_deref());

    let money_widths = [CONTENT_WIDTH_MM * 0.7, CONTENT_WIDTH_MM * 0.3];
    if !report.income.is_empty() {
        let rows = financial_rows(&report.income, "TOTAL INCOME");
        smart_table(doc, "Income", &["SOURCE", "AMOUNT"], &rows, &money_widths);
    }
    if !report.expense.is_empty() {
        let rows = financial_rows(&report.expense, "TOTAL EXPENSE");
        smart_table(doc, "Expense", &["PURPOSE", "AMOUNT"], &rows, &money_widths);
    }

    let attendee_groups = [
        ("Rotaractors", report.rotaractors, &report.rotaractors_details),
        ("Rotary Members", report.rotary, &report.rotary_details),
        ("Others", report.others, &report.others_details),
    ];
    let name_width = CONTENT_WIDTH_MM * 0.4;
    let attendee_widths = [10.0, name_width, CONTENT_WIDTH_MM - 10.0 - name_width];
    for (title, count, details) in attendee_groups {
        // Length is not reconciled with the count.
        if count > 0 && !details.is_empty() {
            let rows = attendee_rows(details);
            smart_table(doc, title, &["#", "NAME", "CLUB"], &rows, &attendee_widths);
        }
    }

    if let Some(image) = &report.poster {
        poster(doc, "Project Poster", image);
    }

    gallery(doc, "Completion Images", &report.images);
}

/// Table rows for income or expense, closed by a computed total row.
pub fn financial_rows(items: &[LineItem], total_label: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            vec![
                item.description.clone(),
                format!("{}{}", CURRENCY_PREFIX, item.amount),
            ]
        })
        .collect();

    let total = total_amount(items);
    rows.push(vec![
        total_label.to_string(),
        format!("{}{}", CURRENCY_PREFIX, format_number(total)),
    ]);
    rows
}

/// Numbered `#`, name, club rows.
pub fn attendee_rows(details: &[Attendee]) -> Vec<Vec<String>> {
    details
        .iter()
        .enumerate()
        .map(|(index, attendee)| {
            vec![
                (index + 1).to_string(),
                attendee.name.clone(),
                attendee.club.clone(),
            ]
        })
        .collect()
}

fn narrative<S: Surface>(doc: &mut Document<S>, label: &str, text: Option<&str>) {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return;
    };
    section_label(doc, label);
    body_text(doc, text);
}

fn club_identity<S: Surface>(doc: &mut Document<S>, report: &ReportData, letterhead: &Letterhead) {
    let club_name = report.club_name.as_deref().unwrap_or(&letterhead.club_name);
    let parent_club = report.parent_club.as_deref().unwrap_or(&letterhead.parent_club);
    let meta = format!(
        "{} | {} | {}",
        report.club_id.as_deref().unwrap_or(&letterhead.club_id),
        report.group.as_deref().unwrap_or(&letterhead.group),
        report.rid.as_deref().unwrap_or(&letterhead.rid),
    );

    doc.ensure_space(2.0 * CLUB_LINE_ADVANCE_MM + CLUB_BLOCK_GAP_MM);
    let center = PAGE_WIDTH_MM / 2.0;

    let y = doc.cursor_y();
    doc.text_centered(&club_name.to_uppercase(), center, y, CLUB_NAME_STYLE);
    doc.advance(CLUB_LINE_ADVANCE_MM);

    let y = doc.cursor_y();
    doc.text_centered(parent_club, center, y, PARENT_CLUB_STYLE);
    doc.advance(CLUB_LINE_ADVANCE_MM);

    let y = doc.cursor_y();
    doc.text_centered(&meta, center, y, CLUB_META_STYLE);
    doc.advance(CLUB_BLOCK_GAP_MM);
}

fn event_title<S: Surface>(doc: &mut Document<S>, report: &ReportData) {
    doc.ensure_space(TITLE_ADVANCE_MM);
    let title = report.event_name.as_deref().unwrap_or(UNTITLED_EVENT);
    let y = doc.cursor_y();
    doc.text(title, MARGIN_MM, y, TITLE_STYLE);
    doc.advance(TITLE_ADVANCE_MM);
}

/// Two-by-two grid; its shape does not depend on which values are present.
fn metadata_grid<S: Surface>(doc: &mut Document<S>, report: &ReportData) {
    let items = [
        ("EVENT CHAIR", report.event_chair.as_deref()),
        ("LOCATION", report.location.as_deref()),
        ("AVENUE", report.avenue.as_deref()),
        ("DATE", report.event_date.as_deref()),
    ];

    let grid_height = 2.0 * META_ROW_HEIGHT_MM + META_GRID_GAP_MM;
    doc.ensure_space(grid_height);

    let top = doc.cursor_y();
    let column_width = CONTENT_WIDTH_MM / 2.0;
    for (index, (label, value)) in items.iter().enumerate() {
        let x = MARGIN_MM + (index % 2) as f32 * column_width;
        let y = top + (index / 2) as f32 * META_ROW_HEIGHT_MM;
        doc.text(label, x, y, META_LABEL_STYLE);
        doc.text(
            value.unwrap_or(PLACEHOLDER),
            x,
            y + META_VALUE_OFFSET_MM,
            META_VALUE_STYLE,
        );
    }

    doc.set_cursor_y(top + grid_height);
}
