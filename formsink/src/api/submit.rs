//! Form submission endpoint
//!
//! One POST endpoint accepting URL-encoded form parameters. The response is
//! always HTTP 200 with a JSON body; the `result` field carries the
//! success/failure signal (see [`crate::outcome::Outcome`]). Even a body
//! the form decoder rejects produces a structured error outcome rather
//! than a bare 4xx.

use std::collections::HashMap;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::Form;

use crate::outcome::Outcome;
use crate::submission::Submission;
use crate::AppState;

/// POST /
///
/// Accepts one form submission and appends it to the bound spreadsheet.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Outcome {
    let Form(fields) = match form {
        Ok(form) => form,
        Err(rejection) => return Outcome::error(rejection.body_text()),
    };

    state.coordinator.handle(Submission::new(fields)).await
}
