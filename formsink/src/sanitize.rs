//! Formula-injection sanitization
//!
//! Spreadsheet engines interpret cell text starting with `=`, `+`, `-` or
//! `@` as a formula. Any submitter-controlled text starting with one of
//! those characters gets a leading apostrophe, which forces text
//! interpretation. This runs in addition to forcing the destination range
//! to plain-text format before the write (see [`crate::store::Sheet`]).

use crate::store::CellValue;

/// Characters a spreadsheet engine treats as formula-start markers
pub const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Neutralize a value that could be interpreted as a spreadsheet formula.
///
/// Text starting with a formula trigger is returned with a leading
/// apostrophe; all other text is returned unchanged. Generated values
/// (timestamps, identifiers) pass through untouched. No trimming, escaping
/// or other reinterpretation is performed.
pub fn sanitize(value: CellValue) -> CellValue {
    match value {
        CellValue::Text(s) if s.starts_with(FORMULA_TRIGGERS) => {
            CellValue::Text(format!("'{}", s))
        }
        other => other,
    }
}
