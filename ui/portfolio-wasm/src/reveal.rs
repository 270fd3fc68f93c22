//! Scroll-reveal: adds `animate-in` the first time an element intersects the
//! viewport, staggering direct children of `.stagger-children` containers.

use std::cell::RefCell;
use std::rc::Rc;

use pf_core::reveal::RevealTracker;
use pf_core::{PortfolioError, Scheduler, TaskHandle};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom;
use crate::events::Controller;
use crate::state::Context;
use crate::timers::BrowserScheduler;

const SLOT_ATTR: &str = "data-reveal-slot";
const ANIMATED_CLASS: &str = "animate-in";

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

pub fn init(ctx: &Context) -> Result<Controller, PortfolioError> {
    let mut ctl = Controller::new("scroll animations");
    let cfg = ctx.config.clone();
    let tracker = Rc::new(RefCell::new(RevealTracker::new()));

    let callback: ObserverCallback = {
        let tracker = tracker.clone();
        let cfg = cfg.clone();
        let sched = ctx.sched;
        let life = ctl.life();
        Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let Some(slot) = target
                    .get_attribute(SLOT_ATTR)
                    .and_then(|s| s.parse::<u32>().ok())
                else {
                    continue;
                };
                let children = dom::has_class(&target, &cfg.reveal.stagger_class)
                    .then(|| dom::children(&target));
                let plan = tracker.borrow_mut().on_intersection(
                    slot,
                    entry.is_intersecting(),
                    children.as_ref().map(Vec::len),
                    cfg.timings.stagger_ms,
                );
                let Some(plan) = plan else {
                    continue;
                };

                dom::add_class(&target, ANIMATED_CLASS);
                for (child, delay) in children.unwrap_or_default().into_iter().zip(plan.child_delays_ms) {
                    stagger(&sched, &life, child, delay);
                }
                observer.unobserve(&target);
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>)
    };

    let opts = IntersectionObserverInit::new();
    opts.set_threshold(&JsValue::from_f64(cfg.reveal.threshold));
    opts.set_root_margin(&cfg.reveal.root_margin());
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &opts)
        .map_err(PortfolioError::js)?;

    for el in dom::query_all(&cfg.reveal.selector()) {
        let slot = tracker.borrow_mut().observe();
        el.set_attribute(SLOT_ATTR, &slot.to_string())
            .map_err(PortfolioError::js)?;
        observer.observe(&el);
    }
    tracing::debug!(watching = tracker.borrow().watching(), "reveal observer attached");

    ctl.on_shutdown(move || {
        observer.disconnect();
        drop(callback);
    });
    Ok(ctl)
}

fn stagger(sched: &BrowserScheduler, life: &TaskHandle, child: Element, delay_ms: u32) {
    sched.schedule(
        delay_ms,
        life.guard(Box::new(move || dom::add_class(&child, ANIMATED_CLASS))),
    );
}
