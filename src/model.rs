//! Report records as supplied by the host application.
//!
//! Field names follow the JSON the report form stores (camelCase). Loosely
//! typed inputs are normalised while deserialising: blank strings become
//! `None`, counts accept numeric strings, unreadable image payloads are
//! kept as empty payloads that fail to draw.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ReportError, Result};
use crate::media::{ImageData, ImageKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportData {
    // Letterhead
    #[serde(deserialize_with = "text")]
    pub club_name: Option<String>,
    #[serde(deserialize_with = "text")]
    pub parent_club: Option<String>,
    #[serde(deserialize_with = "text")]
    pub group: Option<String>,
    /// District label, e.g. "RI DISTRICT : 3206"
    #[serde(deserialize_with = "text")]
    pub rid: Option<String>,
    #[serde(deserialize_with = "text")]
    pub club_id: Option<String>,
    /// Left, centre and right logo slots
    #[serde(deserialize_with = "image_slots")]
    pub logos: Vec<Option<ImageData>>,

    // Event
    #[serde(deserialize_with = "text")]
    pub event_name: Option<String>,
    #[serde(deserialize_with = "text")]
    pub event_chair: Option<String>,
    #[serde(deserialize_with = "text")]
    pub event_date: Option<String>,
    #[serde(deserialize_with = "text")]
    pub avenue: Option<String>,
    #[serde(deserialize_with = "text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "text")]
    pub description: Option<String>,

    // Attendance
    #[serde(deserialize_with = "count")]
    pub rotaractors: u32,
    #[serde(deserialize_with = "count")]
    pub rotary: u32,
    #[serde(deserialize_with = "count")]
    pub others: u32,
    /// Rendered as given; see [`ReportData::recompute_total`].
    #[serde(deserialize_with = "count")]
    pub total: u32,

    // Narrative
    #[serde(deserialize_with = "text")]
    pub report: Option<String>,
    #[serde(deserialize_with = "text")]
    pub why: Option<String>,
    #[serde(deserialize_with = "text")]
    pub impact: Option<String>,

    // Financials
    pub income: Vec<LineItem>,
    pub expense: Vec<LineItem>,

    // Attendee details
    pub rotaractors_details: Vec<Attendee>,
    pub rotary_details: Vec<Attendee>,
    pub others_details: Vec<Attendee>,

    // Media
    #[serde(deserialize_with = "optional_image")]
    pub poster: Option<ImageData>,
    #[serde(deserialize_with = "image_list")]
    pub images: Vec<ImageData>,
}

impl ReportData {
    /// Sets `total` to the sum of the three attendance counts.
    pub fn recompute_total(&mut self) {
        self.total = self
            .rotaractors
            .saturating_add(self.rotary)
            .saturating_add(self.others);
    }

    /// Logos that are actually present, in slot order.
    pub fn present_logos(&self) -> impl Iterator<Item = &ImageData> {
        self.logos.iter().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    #[serde(rename = "desc", alias = "description", deserialize_with = "plain_text")]
    pub description: String,
    pub amount: Amount,
}

impl LineItem {
    pub fn new(description: impl Into<String>, amount: Amount) -> Self {
        LineItem {
            description: description.into(),
            amount,
        }
    }
}

/// A money amount exactly as entered: a JSON number or free text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Text(String::new())
    }
}

impl Amount {
    /// Numeric value for totals; text is read up to its first non-numeric
    /// character and anything unreadable counts as 0.
    pub fn value(&self) -> f64 {
        match self {
            Amount::Number(n) if n.is_finite() => *n,
            Amount::Number(_) => 0.0,
            Amount::Text(s) => parse_leading_float(s).unwrap_or(0.0),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => f.write_str(&format_number(*n)),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => Amount::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => Amount::Text(s),
            Value::Null => Amount::default(),
            other => Amount::Text(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attendee {
    #[serde(deserialize_with = "plain_text")]
    pub name: String,
    #[serde(deserialize_with = "plain_text")]
    pub club: String,
}

/// Sum of all amounts, unreadable ones counting as 0.
pub fn total_amount(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.amount.value()).sum()
}

/// Shortest decimal form of `n`: `5000`, `12.5`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    format!("{}", n)
}

/// Reads the longest leading decimal number in `s`, ignoring leading
/// whitespace and any trailing garbage (`"12abc"` reads as 12).
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Reads the leading integer of `s` the way a form field is read; anything
/// unreadable or negative is 0.
fn parse_count(s: &str) -> u32 {
    let s = s.trim_start();
    let digits: String = s
        .strip_prefix('+')
        .unwrap_or(s)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(if digits.is_empty() { 0 } else { u32::MAX })
}

// ============================================================================
// Loading
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ReportData>),
    One(Box<ReportData>),
}

/// Parses either a single report object or an array of reports.
pub fn load_reports(json: &str) -> Result<Vec<ReportData>> {
    let parsed: OneOrMany = serde_json::from_str(json)
        .map_err(|e| ReportError::InputError(format!("Invalid JSON: {}", e)))?;
    Ok(match parsed {
        OneOrMany::Many(reports) => reports,
        OneOrMany::One(report) => vec![*report],
    })
}

// ============================================================================
// Field deserialisers
// ============================================================================

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn plain_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    text(deserializer).map(Option::unwrap_or_default)
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(v), _) => u32::try_from(v).unwrap_or(u32::MAX),
            (None, Some(f)) if f > 0.0 => f.trunc().min(u32::MAX as f64) as u32,
            _ => 0,
        },
        Value::String(s) => parse_count(&s),
        _ => 0,
    })
}

fn ingest_image(raw: &str) -> Option<ImageData> {
    if raw.trim().is_empty() {
        return None;
    }
    match ImageData::from_data_uri(raw) {
        Ok(image) => Some(image),
        Err(e) => {
            // Kept as an empty payload so its slot survives and fails at draw time.
            log::warn!("Unreadable image payload: {}", e);
            Some(ImageData::new(ImageKind::sniff(raw.trim()), Vec::new()))
        }
    }
}

fn optional_image<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<ImageData>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ingest_image))
}

fn image_slots<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<Option<ImageData>>, D::Error> {
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(|slot| slot.as_deref().and_then(ingest_image))
        .collect())
}

fn image_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<ImageData>, D::Error> {
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(|item| item.as_deref().and_then(ingest_image))
        .collect())
}
