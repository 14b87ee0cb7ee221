//! Helvetica advance widths and greedy line wrapping.
//!
//! The built-in PDF fonts carry no metrics in the file, so widths come from
//! the standard Helvetica AFM tables (WinAnsi printable range, 1/1000 em).

use crate::geometry::PT_PER_MM;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Width used for characters outside the printable ASCII range
const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn char_units(c: char, weight: FontWeight) -> u16 {
    let table = match weight {
        FontWeight::Regular => &HELVETICA,
        FontWeight::Bold => &HELVETICA_BOLD,
    };
    match c as u32 {
        code @ 32..=126 => table[(code - 32) as usize],
        0x2013 => 556,
        0x2014 => 1000,
        _ => FALLBACK_WIDTH,
    }
}

/// Rendered width of `text` in mm at `size_pt`.
pub fn text_width(text: &str, size_pt: f32, weight: FontWeight) -> f32 {
    let units: u32 = text.chars().map(|c| char_units(c, weight) as u32).sum();
    units as f32 / 1000.0 * size_pt / PT_PER_MM
}

/// Splits `text` into lines no wider than `max_width` mm.
///
/// Words are accumulated greedily; explicit newlines always start a new line
/// (so blank lines survive), and a word that is wider than a whole line is
/// broken between characters.
pub fn wrap_text(text: &str, max_width: f32, size_pt: f32, weight: FontWeight) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = start_line(word, max_width, size_pt, weight, &mut lines);
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if text_width(&candidate, size_pt, weight) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = start_line(word, max_width, size_pt, weight, &mut lines);
            }
        }

        lines.push(current);
    }

    lines
}

/// Begins a fresh line with `word`, spilling whole-line chunks of an
/// overlong word into `lines` and returning the remainder.
fn start_line(
    word: &str,
    max_width: f32,
    size_pt: f32,
    weight: FontWeight,
    lines: &mut Vec<String>,
) -> String {
    if text_width(word, size_pt, weight) <= max_width {
        return word.to_string();
    }

    let mut chunk = String::new();
    for c in word.chars() {
        chunk.push(c);
        if chunk.chars().count() > 1 && text_width(&chunk, size_pt, weight) > max_width {
            chunk.pop();
            lines.push(std::mem::take(&mut chunk));
            chunk.push(c);
        }
    }
    chunk
}
