//! `window.PortfolioUtils` for inline page scripts.

use gloo_utils::window;
use js_sys::{Function, Object, Reflect};
use pf_core::util::{Debounced, Throttled, measure};
use pf_core::{NotificationKind, PortfolioError};
use wasm_bindgen::prelude::*;

use crate::events::Controller;
use crate::notify;
use crate::timers::BrowserScheduler;

const GLOBAL_KEY: &str = "PortfolioUtils";

fn kind_from(value: &JsValue) -> NotificationKind {
    value
        .as_string()
        .map(|k| NotificationKind::parse_lossy(&k))
        .unwrap_or_default()
}

fn millis(value: &JsValue) -> u32 {
    value.as_f64().map(|v| v.max(0.0) as u32).unwrap_or(0)
}

/// Calls `func` with a single argument, logging a throw instead of
/// propagating it into the timer.
fn invoke(func: &Function, arg: &JsValue) {
    if let Err(e) = func.call1(&JsValue::NULL, arg) {
        tracing::error!("wrapped function threw: {e:?}");
    }
}

fn notify_fn() -> JsValue {
    Closure::wrap(Box::new(|message: JsValue, kind: JsValue| {
        let message = message.as_string().unwrap_or_default();
        notify::show(&message, kind_from(&kind));
    }) as Box<dyn FnMut(JsValue, JsValue)>)
    .into_js_value()
}

fn debounce_fn() -> JsValue {
    Closure::wrap(Box::new(|func: Function, wait: JsValue, immediate: JsValue| {
        let debounced = Debounced::new(
            BrowserScheduler,
            millis(&wait),
            immediate.is_truthy(),
            move |arg: JsValue| invoke(&func, &arg),
        );
        Closure::wrap(Box::new(move |arg: JsValue| debounced.call(arg)) as Box<dyn FnMut(JsValue)>)
            .into_js_value()
    }) as Box<dyn FnMut(Function, JsValue, JsValue) -> JsValue>)
    .into_js_value()
}

fn throttle_fn() -> JsValue {
    Closure::wrap(Box::new(|func: Function, limit: JsValue| {
        let throttled = Throttled::new(BrowserScheduler, millis(&limit), move |arg: JsValue| {
            invoke(&func, &arg)
        });
        Closure::wrap(Box::new(move |arg: JsValue| throttled.call(arg)) as Box<dyn FnMut(JsValue)>)
            .into_js_value()
    }) as Box<dyn FnMut(Function, JsValue) -> JsValue>)
    .into_js_value()
}

fn measure_fn() -> JsValue {
    Closure::wrap(Box::new(|name: JsValue, func: Function| {
        let name = name.as_string().unwrap_or_default();
        let (result, _) = measure(&BrowserScheduler, &name, || func.call0(&JsValue::NULL));
        result
    }) as Box<dyn FnMut(JsValue, Function) -> Result<JsValue, JsValue>>)
    .into_js_value()
}

/// Publish the helpers on `window`; shutting the controller down removes them.
pub fn install() -> Result<Controller, PortfolioError> {
    let mut ctl = Controller::new("portfolio utils");
    let utils = Object::new();
    let notify = notify_fn();
    let entries = [
        ("notify", notify.clone()),
        ("showNotification", notify),
        ("debounce", debounce_fn()),
        ("throttle", throttle_fn()),
        ("measurePerformance", measure_fn()),
    ];
    for (key, value) in entries {
        Reflect::set(&utils, &JsValue::from_str(key), &value).map_err(PortfolioError::js)?;
    }
    Reflect::set(&window(), &JsValue::from_str(GLOBAL_KEY), &utils).map_err(PortfolioError::js)?;

    ctl.on_shutdown(|| {
        if let Err(e) = Reflect::delete_property(&window(), &JsValue::from_str(GLOBAL_KEY)) {
            tracing::warn!("could not remove window.{GLOBAL_KEY}: {e:?}");
        }
    });
    Ok(ctl)
}
