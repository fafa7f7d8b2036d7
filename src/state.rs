//! Button and status line templates.

use std::time::Duration;

use crate::config::WidgetConfig;
use crate::host::{ButtonView, Navigator};

pub const IDLE_ICON: &str = "📍";
pub const IDLE_LABEL: &str = "Use My Location";
pub const RETRY_LABEL: &str = "Try Again";

pub const SUCCESS_CLASS: &str = "location-status success";
pub const ERROR_CLASS: &str = "location-status error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Text for the status line. `class: None` leaves the element's class untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub text: String,
    pub class: Option<&'static str>,
}

/// Work to run once after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Put the button back to an actionable look.
    Revert {
        icon: &'static str,
        label: &'static str,
    },
    Reload,
}

impl Deferred {
    pub fn run<H: ButtonView + Navigator + ?Sized>(self, host: &H) {
        match self {
            Deferred::Revert { icon, label } => host.restore(icon, label),
            Deferred::Reload => host.reload(),
        }
    }
}

/// Everything [`ButtonView::render`] applies for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonVisual {
    pub state: ButtonState,
    pub disabled: bool,
    /// Whether the button carries the `loading` class.
    pub loading: bool,
    pub icon: &'static str,
    pub label: &'static str,
    pub status: StatusUpdate,
    pub revert: Option<(Duration, Deferred)>,
}

impl ButtonState {
    /// The template for this state, or `None` for `Idle`, which is whatever the page renders.
    ///
    /// A missing or empty `message` falls back to the state's default text.
    pub fn visual(self, message: Option<&str>, config: &WidgetConfig) -> Option<ButtonVisual> {
        let message = message.filter(|message| !message.is_empty());
        let visual = match self {
            ButtonState::Idle => return None,
            ButtonState::Loading => ButtonVisual {
                state: self,
                disabled: true,
                loading: true,
                icon: "🔄",
                label: "Getting Location...",
                status: StatusUpdate {
                    text: String::new(),
                    class: None,
                },
                revert: None,
            },
            ButtonState::Success => ButtonVisual {
                state: self,
                disabled: false,
                loading: false,
                icon: "✅",
                label: "Location Updated",
                status: StatusUpdate {
                    text: message.unwrap_or("Location updated successfully").to_owned(),
                    class: Some(SUCCESS_CLASS),
                },
                revert: Some((
                    config.success_revert(),
                    Deferred::Revert {
                        icon: IDLE_ICON,
                        label: IDLE_LABEL,
                    },
                )),
            },
            ButtonState::Error => ButtonVisual {
                state: self,
                disabled: false,
                loading: false,
                icon: "❌",
                label: "Location Failed",
                status: StatusUpdate {
                    text: message.unwrap_or("Unable to get location").to_owned(),
                    class: Some(ERROR_CLASS),
                },
                revert: Some((
                    config.error_revert(),
                    Deferred::Revert {
                        icon: IDLE_ICON,
                        label: RETRY_LABEL,
                    },
                )),
            },
        };
        Some(visual)
    }
}
