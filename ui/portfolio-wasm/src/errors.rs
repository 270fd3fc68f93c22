//! Page-wide `error` and `unhandledrejection` listeners.

use gloo_utils::window;
use js_sys::Reflect;
use pf_core::notify::error_notice;
use pf_core::{NotificationKind, PortfolioError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{ErrorEvent, PromiseRejectionEvent};

use crate::dom;
use crate::events::Controller;
use crate::notify;
use crate::state;

/// `event.error.message`, when the page can see the thrown error.
fn thrown_message(event: &ErrorEvent) -> Option<String> {
    let error = event.error();
    if error.is_null() || error.is_undefined() {
        return None;
    }
    Reflect::get(&error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
}

pub fn install() -> Result<Controller, PortfolioError> {
    let mut ctl = Controller::new("error reporting");
    let win = window();

    ctl.handlers
        .on(&win, "error", |event| {
            let Some(event) = event.dyn_ref::<ErrorEvent>() else {
                return;
            };
            let thrown = thrown_message(event);
            let message = event.message();
            tracing::error!("JavaScript error: {}", thrown.as_deref().unwrap_or(&message));
            if state::config().is_dev_host(&dom::hostname()) {
                notify::show(
                    &error_notice(thrown.as_deref(), &message),
                    NotificationKind::Error,
                );
            }
        })?
        .on(&win, "unhandledrejection", |event| {
            if let Some(rejection) = event.dyn_ref::<PromiseRejectionEvent>() {
                tracing::error!("unhandled promise rejection: {:?}", rejection.reason());
            }
            event.prevent_default();
        })?;
    Ok(ctl)
}
