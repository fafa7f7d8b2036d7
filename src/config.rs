//! Widget configuration
//!
//! Defaults match the weather page markup and the Flask routes. A page can override any field
//! by defining `window.locationWidgetConfig` before the module loads; keys are camelCase.

use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::{Error, Result};

/// Options passed to `getCurrentPosition`. Times are milliseconds, as the browser takes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: u32,
    pub maximum_age: u32,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: 10_000,
            maximum_age: 300_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    /// JSON endpoint that stores the coordinates in the session.
    pub set_location_url: String,
    /// `action` of the manual location form.
    pub form_action: String,
    pub button_id: String,
    pub status_id: String,
    pub select_id: String,
    /// Wire the button's click listener from the module instead of inline markup.
    pub bind_button: bool,
    /// Storage key of the "already asked" flag.
    pub flag_key: String,
    /// Location name the server renders when it could not resolve one.
    pub unknown_location: String,
    pub success_revert_ms: u64,
    pub error_revert_ms: u64,
    pub reload_delay_ms: u64,
    pub position: PositionOptions,
    pub debug: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            set_location_url: "/set_location".into(),
            form_action: "/user_location".into(),
            button_id: "locationBtn".into(),
            status_id: "locationStatus".into(),
            select_id: "location-select".into(),
            bind_button: true,
            flag_key: "locationRequested".into(),
            unknown_location: "Unknown Location".into(),
            success_revert_ms: 2_000,
            error_revert_ms: 3_000,
            reload_delay_ms: 1_500,
            position: PositionOptions::default(),
            debug: false,
        }
    }
}

impl WidgetConfig {
    /// Parse overrides on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::Config(err.to_string()))
    }

    pub fn success_revert(&self) -> Duration {
        Duration::from_millis(self.success_revert_ms)
    }

    pub fn error_revert(&self) -> Duration {
        Duration::from_millis(self.error_revert_ms)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
