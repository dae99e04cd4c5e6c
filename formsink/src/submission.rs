//! Incoming form submission
//!
//! Wraps the decoded form field map with explicit lookup-with-default
//! semantics. Two field names are reserved: `sheet_name` selects the
//! destination sheet, and the honeypot field marks automated submitters.

use std::collections::HashMap;

/// Reserved field selecting the destination sheet
pub const SHEET_NAME_FIELD: &str = "sheet_name";

/// Destination sheet when no selector is submitted
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Honeypot field: never rendered to real users, only filled by bots
pub const HONEYPOT_FIELD: &str = "mobile_number";

/// One form submission, owned for the duration of a single request
#[derive(Debug, Clone)]
pub struct Submission {
    fields: HashMap<String, String>,
}

impl Submission {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Value of a field, if submitted
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value of a field, or the empty string if absent
    pub fn field_or_empty(&self, name: &str) -> &str {
        self.field(name).unwrap_or("")
    }

    /// Destination sheet name; an absent or empty selector falls back to
    /// [`DEFAULT_SHEET_NAME`]
    pub fn sheet_name(&self) -> &str {
        match self.field(SHEET_NAME_FIELD) {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_SHEET_NAME,
        }
    }

    /// A submission with any non-empty honeypot value is a bot
    pub fn is_bot(&self) -> bool {
        self.field(HONEYPOT_FIELD).is_some_and(|v| !v.is_empty())
    }
}

impl From<HashMap<String, String>> for Submission {
    fn from(fields: HashMap<String, String>) -> Self {
        Self::new(fields)
    }
}
