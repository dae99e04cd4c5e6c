//! Submission outcome and its response encoding
//!
//! Every request produces exactly one `Outcome`, serialized as a JSON body
//! with HTTP 200 in all cases; the `result` field is the sole
//! success/failure signal. A bot-disguised success keeps `"result":
//! "success"` and carries a message instead of a row, so probing bots
//! cannot tell they were detected.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Message returned for honeypot-triggered submissions
pub const BOT_MESSAGE: &str = "Bot detected";

/// Terminal result of one submission
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum Outcome {
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        row: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Error {
        error: String,
    },
}

impl Outcome {
    /// Genuine success: the submission was written at `row`
    pub fn success(row: u32) -> Self {
        Outcome::Success {
            row: Some(row),
            message: None,
        }
    }

    /// Honeypot short-circuit, shaped like a success
    pub fn bot_detected() -> Self {
        Outcome::Success {
            row: None,
            message: Some(BOT_MESSAGE.to_string()),
        }
    }

    /// Failure with the detail text returned verbatim to the submitter
    pub fn error(detail: impl Into<String>) -> Self {
        Outcome::Error {
            error: detail.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        // Always 200; the body's result field carries the signal
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_shape() {
        assert_eq!(
            serde_json::to_value(Outcome::success(7)).unwrap(),
            json!({"result": "success", "row": 7})
        );
    }

    #[test]
    fn bot_shape_omits_row() {
        assert_eq!(
            serde_json::to_value(Outcome::bot_detected()).unwrap(),
            json!({"result": "success", "message": "Bot detected"})
        );
    }

    #[test]
    fn error_shape() {
        assert_eq!(
            serde_json::to_value(Outcome::error("Sheet not found: Missing")).unwrap(),
            json!({"result": "error", "error": "Sheet not found: Missing"})
        );
    }
}
