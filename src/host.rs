//! What the widget needs from the page.
//!
//! Each browser global the widget touches sits behind one of these traits. The browser
//! implementation is `WebHost`; tests use recording fakes. The async methods carry no `Send`
//! bound because browser futures are single-threaded.
#![allow(async_fn_in_trait)]

use std::time::Duration;

use crate::api::{SetLocationRequest, SetLocationResponse};
use crate::config::PositionOptions;
use crate::state::{ButtonVisual, Deferred};
use crate::{Coordinates, PositionError, Result};

pub trait Geolocation {
    /// Whether the capability exists at all.
    fn is_available(&self) -> bool;

    /// One-shot position request. Not cancellable once issued.
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<Coordinates, PositionError>;
}

pub trait Transport {
    /// POST `request` as JSON and decode the reply. Any failure to get a decodable reply is
    /// [`Error::Network`](crate::Error::Network).
    async fn post_location(
        &self,
        url: &str,
        request: &SetLocationRequest,
    ) -> Result<SetLocationResponse>;
}

pub trait FlagStore {
    fn read_flag(&self, key: &str) -> Option<String>;
    fn write_flag(&self, key: &str, value: &str) -> Result<()>;
}

pub trait ButtonView {
    fn render(&self, visual: &ButtonVisual);
    /// Swap icon and label only.
    fn restore(&self, icon: &str, label: &str);
}

pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Deferred);
}

pub trait Navigator {
    fn reload(&self);
    fn alert(&self, message: &str);
}

/// Everything [`LocationWidget`](crate::LocationWidget) needs.
pub trait Host: Geolocation + Transport + FlagStore + ButtonView + Scheduler + Navigator {}

impl<T> Host for T where T: Geolocation + Transport + FlagStore + ButtonView + Scheduler + Navigator
{}
