//! Header-driven row construction
//!
//! The current header row is the single source of truth for what gets
//! written and in what order: the spreadsheet owner can add, remove or
//! reorder columns without redeploying the gateway. Submitted fields with
//! no matching header are silently dropped.

use chrono::Utc;
use uuid::Uuid;

use crate::sanitize::sanitize;
use crate::store::CellValue;
use crate::submission::Submission;

/// Reserved column filled with a fresh unique identifier
pub const ID_COLUMN: &str = "id";

/// Reserved column filled with the submission wall-clock time
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Build the target row for a submission, one cell per header in header
/// order. The identity and timestamp columns are generated server-side;
/// every other cell is the submitted value for that header name (empty
/// string when absent) passed through the sanitizer.
pub fn build_row(headers: &[String], submission: &Submission) -> Vec<CellValue> {
    headers
        .iter()
        .map(|header| match header.as_str() {
            ID_COLUMN => CellValue::Id(Uuid::new_v4()),
            TIMESTAMP_COLUMN => CellValue::Timestamp(Utc::now()),
            name => sanitize(CellValue::Text(
                submission.field_or_empty(name).to_string(),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn submission(pairs: &[(&str, &str)]) -> Submission {
        Submission::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn row_length_and_order_mirror_headers() {
        let h = headers(&["id", "timestamp", "name", "note"]);
        let row = build_row(&h, &submission(&[("note", "hi"), ("name", "Ada")]));

        assert_eq!(row.len(), h.len());
        assert!(matches!(row[0], CellValue::Id(_)));
        assert!(matches!(row[1], CellValue::Timestamp(_)));
        assert_eq!(row[2], CellValue::from("Ada"));
        assert_eq!(row[3], CellValue::from("hi"));
    }

    #[test]
    fn missing_fields_become_empty_strings() {
        let row = build_row(&headers(&["name", "note"]), &submission(&[]));
        assert_eq!(row, vec![CellValue::from(""), CellValue::from("")]);
    }

    #[test]
    fn unknown_submitted_fields_are_dropped() {
        let row = build_row(
            &headers(&["name"]),
            &submission(&[("name", "Ada"), ("extra", "ignored")]),
        );
        assert_eq!(row, vec![CellValue::from("Ada")]);
    }

    #[test]
    fn untrusted_values_are_sanitized() {
        let row = build_row(
            &headers(&["note"]),
            &submission(&[("note", "=CMD|' /C calc'!A0")]),
        );
        assert_eq!(row, vec![CellValue::from("'=CMD|' /C calc'!A0")]);
    }

    #[test]
    fn reserved_columns_ignore_submitted_values() {
        // A submitter cannot spoof the identity or timestamp columns
        let row = build_row(
            &headers(&["id", "timestamp"]),
            &submission(&[("id", "=evil"), ("timestamp", "=evil")]),
        );
        assert!(matches!(row[0], CellValue::Id(_)));
        assert!(matches!(row[1], CellValue::Timestamp(_)));
    }

    #[test]
    fn each_row_gets_a_fresh_identifier() {
        let h = headers(&["id"]);
        let s = submission(&[]);
        let a = build_row(&h, &s);
        let b = build_row(&h, &s);
        assert_ne!(a, b);
    }
}
