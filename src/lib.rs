//! Browser "use my location" widget compiled to WebAssembly
//!
//! This crate drives the location button on the weather page: it asks the browser for the
//! device position, hands the coordinates to the server's `/set_location` endpoint and reloads
//! the page once the server has accepted them. It also rewrites the manual location form so the
//! combined `"lat,lon"` dropdown value reaches `/user_location` as two hidden fields.
//!
//! The widget logic lives in [`LocationWidget`] and never touches browser globals directly.
//! Everything it needs from the page is injected through the traits in [`host`], so the same
//! flow runs against the real DOM on `wasm32` and against recording fakes in tests.
//!
//! ## Platforms
//!
//! - **Web** (`wasm32`): `WebHost` implements every host trait with `web-sys`; the module
//!   start hook mounts the widget once the DOM is ready.
//! - **Other targets**: only [`UnsupportedGeolocation`] is provided, which reports the
//!   capability as absent.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use location_widget::host::Host;
//! use location_widget::{LocationWidget, WidgetConfig};
//!
//! async fn on_click<H: Host>(host: H) {
//!     let widget = LocationWidget::new(host, WidgetConfig::default());
//!     if let Err(err) = widget.acquire_and_send_location().await {
//!         // already rendered in the status line
//!         log::debug!("location flow ended: {err}");
//!     }
//! }
//! ```

pub mod api;
pub mod config;
pub mod form;
pub mod host;
pub mod state;
mod widget;

pub use api::{SetLocationRequest, SetLocationResponse};
pub use config::{PositionOptions, WidgetConfig};
pub use form::{LocationForm, SubmitOutcome};
pub use state::{ButtonState, ButtonVisual, Deferred, StatusUpdate};
pub use widget::LocationWidget;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        // Web platform uses the browser's Geolocation, fetch and DOM APIs
        mod web;
        pub use web::{get_location_and_send, start, WebForm, WebHost};
    } else {
        mod unsupported;
        pub use unsupported::UnsupportedGeolocation;
    }
}

use std::str::FromStr;

/// Result type for widget operations
pub type Result<T> = std::result::Result<T, Error>;

/// An error that ended a widget operation.
///
/// The `Display` text is what the status line shows to the user.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The browser has no geolocation capability.
    #[error("Geolocation not supported by this browser")]
    Unsupported,
    /// The position request failed.
    #[error(transparent)]
    Position(#[from] PositionError),
    /// The server answered with a status other than `"success"`.
    #[error("{}", .0.as_deref().unwrap_or("Server error"))]
    Rejected(Option<String>),
    /// The request never produced a readable response.
    #[error("Network error occurred")]
    Network(String),
    /// A required page element is missing.
    #[error("Missing page element #{0}")]
    MissingElement(String),
    /// A DOM call threw.
    #[error("Page update failed: {0}")]
    Dom(String),
    /// Browser storage is unavailable or refused the write.
    #[error("Browser storage unavailable: {0}")]
    Storage(String),
    /// A combined coordinate value did not parse.
    #[error("Invalid coordinate value: {0:?}")]
    InvalidCoordinates(String),
    /// The page-supplied configuration did not deserialize.
    #[error("Invalid widget configuration: {0}")]
    Config(String),
}

/// Why the browser could not produce a position.
///
/// Codes follow the `GeolocationPositionError` constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("Location access denied by user")]
    PermissionDenied,
    #[error("Location information unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    /// A code the API does not define.
    #[error("Location access denied")]
    Unknown(u16),
}

impl PositionError {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    pub fn from_code(code: u16) -> Self {
        match code {
            Self::PERMISSION_DENIED => PositionError::PermissionDenied,
            Self::POSITION_UNAVAILABLE => PositionError::PositionUnavailable,
            Self::TIMEOUT => PositionError::Timeout,
            other => PositionError::Unknown(other),
        }
    }
}

/// Represents a geographic coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Parses a combined `"lat,lon"` value, splitting on the first comma.
impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidCoordinates(value.to_owned());
        let (lat, lon) = value.split_once(',').ok_or_else(invalid)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid());
        }
        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}
