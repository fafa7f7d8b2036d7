//! Web platform host
//!
//! Implements the host traits over the browser's Geolocation API, `fetch` (through
//! `gloo-net`), `localStorage`, timers and the page DOM, and mounts the widget when the module
//! starts.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_net::http::Request;
use js_sys::{Promise, Reflect};
use log::{debug, error, info, warn, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, Window,
};

use crate::api::{SetLocationRequest, SetLocationResponse};
use crate::config::{PositionOptions, WidgetConfig};
use crate::form::{LocationForm, SubmitOutcome};
use crate::host::{ButtonView, FlagStore, Geolocation, Navigator, Scheduler, Transport};
use crate::state::{ButtonVisual, Deferred};
use crate::{Coordinates, Error, LocationWidget, PositionError, Result};

thread_local! {
    static WIDGET: RefCell<Option<Rc<LocationWidget<WebHost>>>> = const { RefCell::new(None) };
}

fn dom_error(err: JsValue) -> Error {
    Error::Dom(format!("{err:?}"))
}

fn network_error(err: gloo_net::Error) -> Error {
    Error::Network(err.to_string())
}

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// `window.locationWidgetConfig`, if the page defines one.
fn load_config(window: &Window) -> Result<WidgetConfig> {
    let value = Reflect::get(window, &JsValue::from_str("locationWidgetConfig"))
        .map_err(|err| Error::Config(format!("{err:?}")))?;
    if value.is_undefined() || value.is_null() {
        return Ok(WidgetConfig::default());
    }
    let json: String = js_sys::JSON::stringify(&value)
        .map_err(|err| Error::Config(format!("{err:?}")))?
        .into();
    WidgetConfig::from_json(&json)
}

/// The injected `window.locationName`.
fn location_name(window: &Window) -> Option<String> {
    Reflect::get(window, &JsValue::from_str("locationName"))
        .ok()
        .and_then(|value| value.as_string())
}

/// `#locationBtn` with its icon and text children, and `#locationStatus`.
#[derive(Clone)]
struct ButtonElements {
    button: HtmlButtonElement,
    icon: Element,
    text: Element,
    status: Element,
}

impl ButtonElements {
    fn find(document: &Document, config: &WidgetConfig) -> Result<Self> {
        let button = document
            .get_element_by_id(&config.button_id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            .ok_or_else(|| Error::MissingElement(config.button_id.clone()))?;
        let child = |selector: &str| -> Result<Element> {
            button
                .query_selector(selector)
                .map_err(dom_error)?
                .ok_or_else(|| Error::MissingElement(format!("{} {selector}", config.button_id)))
        };
        let icon = child(".btn-icon")?;
        let text = child(".btn-text")?;
        let status = document
            .get_element_by_id(&config.status_id)
            .ok_or_else(|| Error::MissingElement(config.status_id.clone()))?;
        Ok(Self {
            button,
            icon,
            text,
            status,
        })
    }

    fn apply(&self, visual: &ButtonVisual) -> Result<()> {
        self.button.set_disabled(visual.disabled);
        let classes = self.button.class_list();
        if visual.loading {
            classes.add_1("loading").map_err(dom_error)?;
        } else {
            classes.remove_1("loading").map_err(dom_error)?;
        }
        self.icon.set_text_content(Some(visual.icon));
        self.text.set_text_content(Some(visual.label));
        self.status.set_text_content(Some(&visual.status.text));
        if let Some(class) = visual.status.class {
            self.status.set_class_name(class);
        }
        Ok(())
    }
}

/// Browser implementation of [`Host`](crate::host::Host).
///
/// Pages without the location button still get a host; rendering is skipped there.
#[derive(Clone)]
pub struct WebHost {
    window: Window,
    button: Option<ButtonElements>,
}

impl WebHost {
    pub fn new(window: Window, config: &WidgetConfig) -> Result<Self> {
        let document = window
            .document()
            .ok_or_else(|| Error::Dom("no document".into()))?;
        let button = match ButtonElements::find(&document, config) {
            Ok(button) => Some(button),
            Err(err) => {
                debug!("location button not mounted: {err}");
                None
            }
        };
        Ok(Self { window, button })
    }
}

impl Geolocation for WebHost {
    fn is_available(&self) -> bool {
        let navigator = self.window.navigator();
        Reflect::get(&navigator, &JsValue::from_str("geolocation"))
            .map(|value| !value.is_undefined() && !value.is_null())
            .unwrap_or(false)
    }

    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<Coordinates, PositionError> {
        let geolocation = self
            .window
            .navigator()
            .geolocation()
            .map_err(|_| PositionError::PositionUnavailable)?;

        let js_options = web_sys::PositionOptions::new();
        js_options.set_enable_high_accuracy(options.enable_high_accuracy);
        js_options.set_timeout(options.timeout);
        js_options.set_maximum_age(options.maximum_age);

        // the executor runs synchronously, so a refused request is known before awaiting
        let mut refused = None;
        let promise = Promise::new(&mut |resolve, reject| {
            refused = geolocation
                .get_current_position_with_error_callback_and_options(
                    &resolve,
                    Some(&reject),
                    &js_options,
                )
                .err();
        });
        if let Some(err) = refused {
            error!("position request refused: {err:?}");
            return Err(PositionError::PositionUnavailable);
        }

        match JsFuture::from(promise).await {
            Ok(value) => {
                let coords = value.unchecked_into::<web_sys::Position>().coords();
                Ok(Coordinates {
                    latitude: coords.latitude(),
                    longitude: coords.longitude(),
                })
            }
            Err(value) => Err(value
                .dyn_into::<web_sys::PositionError>()
                .map(|err| PositionError::from_code(err.code()))
                .unwrap_or(PositionError::Unknown(0))),
        }
    }
}

impl Transport for WebHost {
    async fn post_location(
        &self,
        url: &str,
        request: &SetLocationRequest,
    ) -> Result<SetLocationResponse> {
        let response = Request::post(url)
            .json(request)
            .map_err(network_error)?
            .send()
            .await
            .map_err(network_error)?;
        response
            .json::<SetLocationResponse>()
            .await
            .map_err(network_error)
    }
}

impl FlagStore for WebHost {
    fn read_flag(&self, key: &str) -> Option<String> {
        self.window
            .local_storage()
            .ok()
            .flatten()?
            .get_item(key)
            .ok()
            .flatten()
    }

    fn write_flag(&self, key: &str, value: &str) -> Result<()> {
        let storage = self
            .window
            .local_storage()
            .map_err(|err| Error::Storage(format!("{err:?}")))?
            .ok_or_else(|| Error::Storage("localStorage is disabled".into()))?;
        storage
            .set_item(key, value)
            .map_err(|err| Error::Storage(format!("{err:?}")))
    }
}

impl ButtonView for WebHost {
    fn render(&self, visual: &ButtonVisual) {
        let Some(button) = &self.button else {
            return;
        };
        if let Err(err) = button.apply(visual) {
            error!("failed to render {:?}: {err}", visual.state);
        }
    }

    fn restore(&self, icon: &str, label: &str) {
        if let Some(button) = &self.button {
            button.icon.set_text_content(Some(icon));
            button.text.set_text_content(Some(label));
        }
    }
}

impl Scheduler for WebHost {
    fn schedule(&self, delay: Duration, task: Deferred) {
        let host = self.clone();
        let callback = Closure::once_into_js(move || task.run(&host));
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            error!("failed to schedule {task:?}: {err:?}");
        }
    }
}

impl Navigator for WebHost {
    fn reload(&self) {
        if let Err(err) = self.window.location().reload() {
            error!("reload failed: {err:?}");
        }
    }

    fn alert(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            warn!("alert failed: {err:?}");
        }
    }
}

/// The manual location form and its dropdown.
pub struct WebForm {
    document: Document,
    form: HtmlFormElement,
    select_id: String,
}

impl WebForm {
    /// `form[action="<form_action>"]`, if the page has one.
    pub fn find(document: &Document, config: &WidgetConfig) -> Result<Option<Self>> {
        let selector = format!("form[action=\"{}\"]", config.form_action);
        let Some(element) = document.query_selector(&selector).map_err(dom_error)? else {
            return Ok(None);
        };
        let form = element
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| Error::Dom(format!("{selector} is not a form")))?;
        Ok(Some(Self {
            document: document.clone(),
            form,
            select_id: config.select_id.clone(),
        }))
    }

    fn select(&self) -> Result<HtmlSelectElement> {
        self.document
            .get_element_by_id(&self.select_id)
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .ok_or_else(|| Error::MissingElement(self.select_id.clone()))
    }
}

impl LocationForm for WebForm {
    fn selected_value(&self) -> Result<String> {
        Ok(self.select()?.value())
    }

    fn remove_fields(&self, name: &str) -> Result<()> {
        let selector = format!("input[name=\"{name}\"]");
        while let Some(existing) = self.form.query_selector(&selector).map_err(dom_error)? {
            existing.remove();
        }
        Ok(())
    }

    fn append_hidden_field(&self, name: &str, value: &str) -> Result<()> {
        let input = self
            .document
            .create_element("input")
            .map_err(dom_error)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| Error::Dom("created element is not an input".into()))?;
        input.set_type("hidden");
        input.set_name(name);
        input.set_value(value);
        self.form.append_child(&input).map_err(dom_error)?;
        Ok(())
    }

    fn disable_select(&self) -> Result<()> {
        self.select()?.set_disabled(true);
        Ok(())
    }
}

fn spawn_flow(widget: Rc<LocationWidget<WebHost>>) {
    spawn_local(async move {
        if let Err(err) = widget.acquire_and_send_location().await {
            debug!("location flow ended: {err}");
        }
    });
}

fn mount(window: Window, config: WidgetConfig) -> Result<()> {
    let document = window
        .document()
        .ok_or_else(|| Error::Dom("no document".into()))?;
    let host = WebHost::new(window.clone(), &config)?;
    let widget = Rc::new(LocationWidget::new(host, config));

    if let Some(form) = WebForm::find(&document, widget.config())? {
        let target = form.form.clone();
        let form_widget = Rc::clone(&widget);
        let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            match form_widget.intercept_submit(&form) {
                Ok(SubmitOutcome::Cancelled) => event.prevent_default(),
                Ok(SubmitOutcome::Proceed { lat, lon }) => debug!("submitting {lat},{lon}"),
                Err(err) => error!("location form: {err}"),
            }
        });
        target
            .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        on_submit.forget();
    }

    if widget.config().bind_button {
        if let Some(elements) = &widget.host().button {
            let click_widget = Rc::clone(&widget);
            let on_click =
                Closure::<dyn FnMut()>::new(move || spawn_flow(Rc::clone(&click_widget)));
            elements
                .button
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
                .map_err(dom_error)?;
            on_click.forget();
        }
    }

    match widget.initialize(location_name(&window).as_deref()) {
        Ok(flagged) => debug!("initialized, flag written: {flagged}"),
        Err(err) => warn!("could not record location prompt: {err}"),
    }

    WIDGET.with(|slot| *slot.borrow_mut() = Some(widget));
    Ok(())
}

/// Module start hook. Mounts the widget now, or on `DOMContentLoaded` while the document is
/// still parsing.
#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let window = web_sys::window().ok_or("No window object")?;

    let config = load_config(&window);
    init_logging(config.as_ref().map(WidgetConfig::log_level).unwrap_or(LevelFilter::Info));
    let config = config.unwrap_or_else(|err| {
        warn!("{err}, using defaults");
        WidgetConfig::default()
    });

    let document = window.document().ok_or("No document object")?;
    if document.ready_state() == "loading" {
        let mount_window = window.clone();
        let on_ready = Closure::once_into_js(move || {
            if let Err(err) = mount(mount_window, config) {
                error!("location widget not mounted: {err}");
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else if let Err(err) = mount(window, config) {
        error!("location widget not mounted: {err}");
    }
    info!("location widget loaded");
    Ok(())
}

/// Start the location flow from page script, e.g. an inline `onclick`.
#[wasm_bindgen(js_name = getLocationAndSend)]
pub fn get_location_and_send() {
    match WIDGET.with(|slot| slot.borrow().clone()) {
        Some(widget) => spawn_flow(widget),
        None => warn!("getLocationAndSend called before the widget mounted"),
    }
}
