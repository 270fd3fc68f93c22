//! Portfolio site frontend.
//!
//! Binds `pf-core` to the page: each concern is an initializer that returns a
//! [`events::Controller`] owning its listeners and timers, so `teardown()`
//! can undo everything.

mod back_to_top;
mod config;
mod contact;
mod dom;
mod errors;
mod events;
mod loading;
mod logging;
mod navigation;
mod notify;
mod reveal;
mod scroll;
mod state;
mod timers;
mod typing;
mod utils;

use gloo_utils::document;
use pf_core::{NotificationKind, PortfolioError, SiteConfig};
use wasm_bindgen::prelude::*;

use crate::events::Controller;
use crate::state::Context;

type Initializer = fn(&Context) -> Result<Controller, PortfolioError>;

/// Page initializers, in start-up order.
const INITIALIZERS: &[Initializer] = &[
    loading::init,
    navigation::init,
    scroll::init,
    typing::init,
    contact::init,
    back_to_top::init,
    reveal::init,
];

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let (cfg, config_error) = match config::load() {
        Ok(cfg) => (cfg, None),
        Err(e) => (SiteConfig::default(), Some(e)),
    };
    logging::init(&cfg.log_level);
    if let Some(e) = config_error {
        tracing::warn!("using default configuration: {e}");
    }
    state::set_config(cfg);

    for install in [errors::install, utils::install] {
        match install() {
            Ok(ctl) => state::adopt(ctl),
            Err(e) => tracing::error!("global hook not installed: {e}"),
        }
    }

    if document().ready_state() == "loading" {
        let mut bootstrap = Controller::new("bootstrap");
        let registered = bootstrap
            .handlers
            .on(&document(), "DOMContentLoaded", |_| boot())
            .map(|_| ());
        match registered {
            Ok(_) => state::adopt(bootstrap),
            Err(e) => tracing::error!("could not wait for DOMContentLoaded: {e}"),
        }
    } else {
        boot();
    }
}

fn boot() {
    tracing::info!("Portfolio initializing...");
    let ctx = Context::bind();
    for init in INITIALIZERS {
        match init(&ctx) {
            Ok(ctl) => {
                tracing::debug!(controller = ctl.name, listeners = ctl.handlers.len(), "ready");
                state::adopt(ctl);
            }
            Err(e) => tracing::error!("initializer failed: {e}"),
        }
    }
    tracing::info!("Portfolio initialized successfully");
}

/// Show a notification from JS. `kind` defaults to `info`; unknown kinds
/// are treated as `info`.
#[wasm_bindgen(js_name = notify)]
pub fn notify_js(message: &str, kind: Option<String>) {
    let kind = kind
        .as_deref()
        .map(NotificationKind::parse_lossy)
        .unwrap_or_default();
    notify::show(message, kind);
}

/// Cancel every timer, remove every listener and retract
/// `window.PortfolioUtils`.
#[wasm_bindgen]
pub fn teardown() {
    let controllers = state::take_controllers();
    let count = controllers.len();
    for ctl in controllers {
        ctl.shutdown();
    }
    if let Some(toast) = state::current_toast() {
        toast.dismiss();
    }
    tracing::info!(controllers = count, "portfolio torn down");
}
