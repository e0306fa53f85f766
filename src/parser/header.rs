//! Header field extraction used to name parts.
//!
//! Typical plate header (type 6):
//!
//! ```text
//! ST
//! ** optional comment
//! <order id>
//! <type code>
//! <piece mark>
//! <assembly mark>
//! <grade>
//! <quantity>
//! <profile>
//! ...
//! B
//! <length> / <width> / <thickness> ...
//! ```

use super::values::{number_regex, parse_number};
use crate::model::{PartHeader, NOT_AVAILABLE};
use regex::Regex;
use std::sync::OnceLock;

/// Lines scanned after `ST` for header fields.
const HEADER_SCAN_LINES: usize = 30;

/// Header fields kept after skipping blanks and comments.
const HEADER_FIELDS: usize = 9;

/// Lines scanned after `B` for dimension values.
const B_SCAN_LINES: usize = 20;

/// Dimension values collected from the `B` block.
const B_MAX_VALUES: usize = 12;

/// Lines searched for a grade when the header field is empty.
const GRADE_SCAN_LINES: usize = 60;

fn find_marker(lines: &[&str], marker: &str) -> Option<usize> {
    lines
        .iter()
        .position(|line| line.trim().to_uppercase() == marker)
}

/// Collect the non-blank, non-comment lines following `ST`.
fn header_sequence<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let start = find_marker(lines, "ST").map_or(0, |idx| idx + 1);

    lines[start..]
        .iter()
        .take(HEADER_SCAN_LINES)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with("**"))
        .take(HEADER_FIELDS)
        .collect()
}

/// Format a number with at most three decimals and no trailing zeros.
fn normalize_number(token: &str) -> Option<String> {
    let value = parse_number(token)?;
    let formatted = format!("{:.3}", value);
    Some(
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string(),
    )
}

/// Read the plate thickness: third value of the `B` block.
pub fn parse_thickness(lines: &[&str]) -> Option<String> {
    let b_idx = find_marker(lines, "B")?;

    let values: Vec<&str> = lines[b_idx + 1..]
        .iter()
        .take(B_SCAN_LINES)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter_map(|line| number_regex().find(line).map(|m| m.as_str()))
        .take(B_MAX_VALUES)
        .collect();

    values.get(2).and_then(|token| normalize_number(token))
}

fn grade_regexes() -> &'static [Regex] {
    static GRADE_REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    GRADE_REGEXES.get_or_init(|| {
        [
            r"(?i)\bS[2-9][0-9]{2}[A-Z0-9]{0,3}\b",
            r"(?i)\bA36\b",
            r"(?i)\b1\.[0-9]{4}\b",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("invalid grade pattern"))
        .collect()
    })
}

/// Resolve the steel grade from the header field or the top of the file.
pub fn find_grade(header_grade: &str, lines: &[&str]) -> String {
    let header_grade = header_grade.trim();
    if !header_grade.is_empty() {
        return header_grade.to_uppercase();
    }

    for regex in grade_regexes() {
        for line in lines.iter().take(GRADE_SCAN_LINES) {
            if let Some(m) = regex.find(line) {
                return m.as_str().to_uppercase();
            }
        }
    }

    NOT_AVAILABLE.to_string()
}

fn parse_quantity(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(q) if q > 0 => u32::try_from(q).unwrap_or(u32::MAX),
        _ => 1,
    }
}

/// Parse the header fields of an NC1 file.
///
/// `fallback_stem` names the part when the header has no piece mark.
pub fn parse_header(lines: &[&str], fallback_stem: &str) -> PartHeader {
    let seq = header_sequence(lines);
    let field = |idx: usize| seq.get(idx).copied().unwrap_or("").to_string();

    let piece = field(2);
    let name = if piece.is_empty() {
        fallback_stem.to_string()
    } else {
        piece
    };

    PartHeader {
        id: field(0),
        type_code: field(1),
        name,
        assembly: field(3),
        grade: find_grade(&field(4), lines),
        quantity: parse_quantity(&field(5)),
        profile: field(6),
        thickness: parse_thickness(lines),
    }
}
