#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use location_widget::host::{ButtonView, FlagStore, Geolocation, Navigator, Scheduler, Transport};
use location_widget::{
    ButtonVisual, Coordinates, Deferred, Error, LocationForm, PositionError, PositionOptions,
    Result, SetLocationRequest, SetLocationResponse,
};

/// Geolocation that answers with a fixed result.
pub struct FixedGeolocation {
    pub available: bool,
    pub result: std::result::Result<Coordinates, PositionError>,
    pub seen_options: RefCell<Vec<PositionOptions>>,
}

impl FixedGeolocation {
    pub fn fix(latitude: f64, longitude: f64) -> Self {
        Self::answering(Ok(Coordinates {
            latitude,
            longitude,
        }))
    }

    pub fn failing(err: PositionError) -> Self {
        Self::answering(Err(err))
    }

    fn answering(result: std::result::Result<Coordinates, PositionError>) -> Self {
        Self {
            available: true,
            result,
            seen_options: RefCell::new(Vec::new()),
        }
    }
}

impl Geolocation for FixedGeolocation {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<Coordinates, PositionError> {
        self.seen_options.borrow_mut().push(*options);
        self.result
    }
}

/// Records everything the widget does to the page.
pub struct FakeHost<G> {
    pub geolocation: G,
    pub reply: RefCell<Result<SetLocationResponse>>,
    pub posts: RefCell<Vec<(String, SetLocationRequest)>>,
    pub renders: RefCell<Vec<ButtonVisual>>,
    pub restores: RefCell<Vec<(String, String)>>,
    pub scheduled: RefCell<Vec<(Duration, Deferred)>>,
    pub flags: RefCell<HashMap<String, String>>,
    pub storage_broken: bool,
    pub alerts: RefCell<Vec<String>>,
    pub reloads: Cell<u32>,
}

impl<G> FakeHost<G> {
    pub fn new(geolocation: G) -> Self {
        Self {
            geolocation,
            reply: RefCell::new(Ok(SetLocationResponse {
                status: "success".into(),
                ..Default::default()
            })),
            posts: RefCell::new(Vec::new()),
            renders: RefCell::new(Vec::new()),
            restores: RefCell::new(Vec::new()),
            scheduled: RefCell::new(Vec::new()),
            flags: RefCell::new(HashMap::new()),
            storage_broken: false,
            alerts: RefCell::new(Vec::new()),
            reloads: Cell::new(0),
        }
    }

    pub fn replying(self, reply: Result<SetLocationResponse>) -> Self {
        *self.reply.borrow_mut() = reply;
        self
    }

    /// Rendered states paired with their status text.
    pub fn transitions(&self) -> Vec<(location_widget::ButtonState, String)> {
        self.renders
            .borrow()
            .iter()
            .map(|visual| (visual.state, visual.status.text.clone()))
            .collect()
    }

    /// Run every scheduled task in delay order, like a fake clock running out.
    pub fn run_timers(&self) {
        let mut due = self.scheduled.take();
        due.sort_by_key(|(delay, _)| *delay);
        for (_, task) in due {
            task.run(self);
        }
    }
}

impl<G: Geolocation> Geolocation for FakeHost<G> {
    fn is_available(&self) -> bool {
        self.geolocation.is_available()
    }

    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<Coordinates, PositionError> {
        self.geolocation.current_position(options).await
    }
}

impl<G> Transport for FakeHost<G> {
    async fn post_location(
        &self,
        url: &str,
        request: &SetLocationRequest,
    ) -> Result<SetLocationResponse> {
        self.posts.borrow_mut().push((url.to_owned(), *request));
        self.reply.borrow().clone()
    }
}

impl<G> FlagStore for FakeHost<G> {
    fn read_flag(&self, key: &str) -> Option<String> {
        self.flags.borrow().get(key).cloned()
    }

    fn write_flag(&self, key: &str, value: &str) -> Result<()> {
        if self.storage_broken {
            return Err(Error::Storage("QuotaExceededError".into()));
        }
        self.flags
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

impl<G> ButtonView for FakeHost<G> {
    fn render(&self, visual: &ButtonVisual) {
        self.renders.borrow_mut().push(visual.clone());
    }

    fn restore(&self, icon: &str, label: &str) {
        self.restores
            .borrow_mut()
            .push((icon.to_owned(), label.to_owned()));
    }
}

impl<G> Scheduler for FakeHost<G> {
    fn schedule(&self, delay: Duration, task: Deferred) {
        self.scheduled.borrow_mut().push((delay, task));
    }
}

impl<G> Navigator for FakeHost<G> {
    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }
}

/// In-memory form: a dropdown value and an ordered list of inputs.
#[derive(Default)]
pub struct FakeForm {
    pub value: RefCell<String>,
    pub inputs: RefCell<Vec<(String, String)>>,
    pub select_disabled: Cell<bool>,
    pub mutations: Cell<u32>,
}

impl FakeForm {
    pub fn selecting(value: &str) -> Self {
        let form = Self::default();
        *form.value.borrow_mut() = value.to_owned();
        form
    }

    pub fn fields(&self, name: &str) -> Vec<String> {
        self.inputs
            .borrow()
            .iter()
            .filter(|(field, _)| field == name)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

impl LocationForm for FakeForm {
    fn selected_value(&self) -> Result<String> {
        Ok(self.value.borrow().clone())
    }

    fn remove_fields(&self, name: &str) -> Result<()> {
        self.mutations.set(self.mutations.get() + 1);
        self.inputs.borrow_mut().retain(|(field, _)| field != name);
        Ok(())
    }

    fn append_hidden_field(&self, name: &str, value: &str) -> Result<()> {
        self.mutations.set(self.mutations.get() + 1);
        self.inputs
            .borrow_mut()
            .push((name.to_owned(), value.to_owned()));
        Ok(())
    }

    fn disable_select(&self) -> Result<()> {
        self.mutations.set(self.mutations.get() + 1);
        self.select_disabled.set(true);
        Ok(())
    }
}
