//! Page-wide state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Controllers keep their own state in their closures; only the config, the
//! shared notification widget and the list of running controllers live here.

use std::cell::RefCell;
use std::rc::Rc;

use pf_core::SiteConfig;

use crate::dom::Elements;
use crate::events::Controller;
use crate::notify::{self, DomToast, DomToaster};
use crate::timers::BrowserScheduler;

/// What every initializer gets.
#[derive(Clone)]
pub struct Context {
    pub config: Rc<SiteConfig>,
    pub sched: BrowserScheduler,
    pub els: Elements,
}

impl Context {
    pub fn bind() -> Self {
        Self {
            config: config(),
            sched: BrowserScheduler,
            els: Elements::bind(),
        }
    }
}

#[derive(Default)]
pub struct AppState {
    pub config: Rc<SiteConfig>,
    pub toaster: Option<DomToaster>,
    pub controllers: Vec<Controller>,
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the state.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn config() -> Rc<SiteConfig> {
    with(|s| s.config.clone())
}

pub fn set_config(cfg: SiteConfig) {
    with_mut(|s| {
        s.config = Rc::new(cfg);
        s.toaster = None;
    });
}

/// The shared notification widget, created on first use.
pub fn toaster() -> DomToaster {
    with_mut(|s| {
        let auto_hide = s.config.timings.notify_auto_hide_ms;
        let exit = s.config.timings.notify_exit_ms;
        s.toaster
            .get_or_insert_with(|| notify::new_toaster(auto_hide, exit))
            .clone()
    })
}

/// The notification on screen, if the widget was ever used.
pub fn current_toast() -> Option<DomToast> {
    with(|s| s.toaster.as_ref().and_then(|t| t.current()))
}

pub fn adopt(controller: Controller) {
    with_mut(|s| s.controllers.push(controller));
}

/// Remove every controller, most recent first.
pub fn take_controllers() -> Vec<Controller> {
    let mut taken = with_mut(|s| std::mem::take(&mut s.controllers));
    taken.reverse();
    taken
}
