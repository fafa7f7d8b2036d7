//! Wire types for `POST /set_location`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Coordinates, Error};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SetLocationRequest {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinates> for SetLocationRequest {
    fn from(coords: Coordinates) -> Self {
        Self {
            lat: coords.latitude,
            lon: coords.longitude,
        }
    }
}

/// Server reply. Accepted requests echo the stored coordinates; rejected ones carry a message
/// and arrive with HTTP 400, which is not treated differently from a 200.
///
/// Fields decode leniently: a reply with odd field types is still a reply, not a transport
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetLocationResponse {
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lon: Option<f64>,
}

/// Strings as-is, `null` as absent, anything else as its JSON text.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text.trim().parse().ok(),
        other => other.as_f64(),
    })
}

impl SetLocationResponse {
    pub const SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }

    /// The error to show for a non-success reply. An empty message counts as none.
    pub fn into_rejection(self) -> Error {
        Error::Rejected(self.message.filter(|message| !message.is_empty()))
    }
}
