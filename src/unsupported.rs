//! Geolocation backend for targets without a browser.

use crate::config::PositionOptions;
use crate::host::Geolocation;
use crate::{Coordinates, PositionError};

/// Reports the capability as absent, so the widget fails with
/// [`Error::Unsupported`](crate::Error::Unsupported) before it renders the loading state.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedGeolocation;

impl Geolocation for UnsupportedGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, PositionError> {
        Err(PositionError::PositionUnavailable)
    }
}
