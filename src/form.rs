//! Manual location form.
//!
//! The dropdown's option values are combined `"lat,lon"` strings but `/user_location` reads
//! separate `lat` and `lon` fields, so the value is split into hidden inputs on submit.

use crate::Result;

pub const LAT_FIELD: &str = "lat";
pub const LON_FIELD: &str = "lon";

pub const SELECT_PROMPT: &str = "Please select a location";
pub const INVALID_PROMPT: &str = "Please select a valid location";

/// The form as the submit interceptor sees it.
pub trait LocationForm {
    /// Current dropdown value, empty when nothing is selected.
    fn selected_value(&self) -> Result<String>;
    /// Remove every input named `name`.
    fn remove_fields(&self, name: &str) -> Result<()>;
    fn append_hidden_field(&self, name: &str, value: &str) -> Result<()>;
    fn disable_select(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Submission must be prevented.
    Cancelled,
    /// Native submission goes ahead with these field values.
    Proceed { lat: String, lon: String },
}

/// Split on the first comma. Both halves are kept verbatim.
pub fn split_combined(value: &str) -> Option<(&str, &str)> {
    value.split_once(',')
}
