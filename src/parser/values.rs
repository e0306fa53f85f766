//! Numeric field extraction for AK/IK contour lines and BO bore lines.
//!
//! Lines that do not carry enough numbers are skipped silently: NC1 writers
//! put headers, blanks and comments inside these blocks.

use crate::model::{BoreRecord, CurvaturePoint};
use regex::Regex;
use std::sync::OnceLock;

/// Pattern for a signed number with `.` or `,` as decimal separator.
///
/// Digits are ASCII only; other Unicode digits are not numeric tokens.
pub(crate) const NUMBER_PATTERN: &str = r"[+-]?(?-u:\d)+(?:[.,](?-u:\d)+)?";

pub(crate) fn number_regex() -> &'static Regex {
    static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    NUMBER_REGEX.get_or_init(|| Regex::new(NUMBER_PATTERN).expect("invalid number pattern"))
}

/// Parse one numeric token, accepting a decimal comma.
pub(crate) fn parse_number(token: &str) -> Option<f64> {
    token.replace(',', ".").parse().ok()
}

/// Extract all numeric tokens from a line, in order.
pub fn extract_numbers(line: &str) -> Vec<f64> {
    number_regex()
        .find_iter(line)
        .filter_map(|m| parse_number(m.as_str()))
        .collect()
}

/// Parse AK/IK lines (`x y [k]`) into contour points.
pub fn parse_curvature_points(lines: &[&str]) -> Vec<CurvaturePoint> {
    lines
        .iter()
        .filter_map(|line| {
            let nums = extract_numbers(line);
            if nums.len() < 2 {
                return None;
            }
            let k = nums.get(2).copied().unwrap_or(0.0);
            Some(CurvaturePoint::new(nums[0], nums[1], k))
        })
        .collect()
}

/// Check for the slot marker letter.
fn has_slot_marker(line: &str) -> bool {
    line.contains(|c: char| c == 'l' || c == 'L')
}

/// Classify one BO line.
///
/// Slot: `x y d <unused> l dx dy ...` (marker letter and at least six numbers).
/// Hole: `x y d ...` (at least three numbers). The fourth number of a slot line
/// is not used.
pub fn classify_bore_line(line: &str) -> Option<BoreRecord> {
    let nums = extract_numbers(line);

    if has_slot_marker(line) && nums.len() >= 6 {
        Some(BoreRecord::slot(nums[0], nums[1], nums[2], nums[4], nums[5]))
    } else if nums.len() >= 3 {
        Some(BoreRecord::hole(nums[0], nums[1], nums[2]))
    } else {
        None
    }
}

/// Parse all bores of a BO block.
pub fn parse_bores(lines: &[&str]) -> Vec<BoreRecord> {
    lines
        .iter()
        .filter_map(|line| classify_bore_line(line))
        .collect()
}
