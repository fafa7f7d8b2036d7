use log::{debug, error, info, warn};

use crate::api::SetLocationRequest;
use crate::config::WidgetConfig;
use crate::form::{self, LocationForm, SubmitOutcome, LAT_FIELD, LON_FIELD};
use crate::host::Host;
use crate::state::{ButtonState, Deferred};
use crate::{Coordinates, Error, Result};

const REFRESHING_MESSAGE: &str = "Refreshing weather data...";
const FLAG_VALUE: &str = "true";

/// The location button, its status line and the manual location form.
///
/// Only one position request should be in flight at a time. That is enforced by the button
/// being disabled while loading; calling [`acquire_and_send_location`](Self::acquire_and_send_location)
/// directly is not guarded.
pub struct LocationWidget<H> {
    host: H,
    config: WidgetConfig,
}

impl<H: Host> LocationWidget<H> {
    pub fn new(host: H, config: WidgetConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Render `state` and schedule its revert, if it has one.
    pub fn set_state(&self, state: ButtonState, message: Option<&str>) {
        let Some(visual) = state.visual(message, &self.config) else {
            return;
        };
        debug!("button -> {:?} {:?}", visual.state, visual.status.text);
        self.host.render(&visual);
        if let Some((delay, task)) = visual.revert {
            self.host.schedule(delay, task);
        }
    }

    /// Get a fix, hand it to the server and reload on success.
    ///
    /// Every failure has already been rendered in the status line when it is returned.
    pub async fn acquire_and_send_location(&self) -> Result<()> {
        let result = self.locate_and_send().await;
        if let Err(err) = &result {
            match err {
                Error::Network(cause) => error!("location upload failed: {cause}"),
                other => warn!("location update failed: {other}"),
            }
            self.set_state(ButtonState::Error, Some(&err.to_string()));
        }
        result
    }

    async fn locate_and_send(&self) -> Result<()> {
        if !self.host.is_available() {
            return Err(Error::Unsupported);
        }
        self.set_state(ButtonState::Loading, None);

        let coords = self.host.current_position(&self.config.position).await?;
        debug!("position fix {}, {}", coords.latitude, coords.longitude);

        let request = SetLocationRequest::from(coords);
        let response = self
            .host
            .post_location(&self.config.set_location_url, &request)
            .await?;
        if !response.is_success() {
            return Err(response.into_rejection());
        }

        self.set_state(ButtonState::Success, Some(REFRESHING_MESSAGE));
        // fires before the success revert
        self.host.schedule(self.config.reload_delay(), Deferred::Reload);
        Ok(())
    }

    /// Handle a submit of the manual location form.
    pub fn intercept_submit<F: LocationForm + ?Sized>(&self, form: &F) -> Result<SubmitOutcome> {
        let value = form.selected_value()?;
        if value.is_empty() {
            self.host.alert(form::SELECT_PROMPT);
            return Ok(SubmitOutcome::Cancelled);
        }
        let Some((lat, lon)) = form::split_combined(&value) else {
            warn!("location option {value:?} has no comma");
            self.host.alert(form::INVALID_PROMPT);
            return Ok(SubmitOutcome::Cancelled);
        };
        if let Err(err) = value.parse::<Coordinates>() {
            // the server rejects it and redirects home
            warn!("submitting unparseable location: {err}");
        }

        form.remove_fields(LAT_FIELD)?;
        form.remove_fields(LON_FIELD)?;
        form.append_hidden_field(LAT_FIELD, lat)?;
        form.append_hidden_field(LON_FIELD, lon)?;
        form.disable_select()?;

        Ok(SubmitOutcome::Proceed {
            lat: lat.to_owned(),
            lon: lon.to_owned(),
        })
    }

    /// Page-load bookkeeping. Flags the profile as asked when the page has no usable location
    /// and the flag is not already set; returns whether it wrote the flag.
    pub fn initialize(&self, location_name: Option<&str>) -> Result<bool> {
        let name = location_name.unwrap_or_default();
        let has_location = !name.is_empty() && name != self.config.unknown_location;
        let flagged = self
            .host
            .read_flag(&self.config.flag_key)
            .is_some_and(|value| !value.is_empty());
        if has_location || flagged {
            return Ok(false);
        }
        self.host.write_flag(&self.config.flag_key, FLAG_VALUE)?;
        info!("no location for this page, set {}", self.config.flag_key);
        Ok(true)
    }
}
