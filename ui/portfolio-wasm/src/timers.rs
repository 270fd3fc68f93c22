//! Browser implementation of `pf_core::Scheduler`.
//!
//! Timeouts go through `gloo-timers`, frames through `requestAnimationFrame`.
//! Cancelling a handle clears the underlying browser timer.

use gloo_timers::callback::Timeout;
use gloo_utils::window;
use pf_core::schedule::Task;
use pf_core::{Scheduler, TaskHandle};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let guarded = handle.guard(task);
        let id = Timeout::new(delay_ms, move || guarded()).forget();
        handle.set_canceller(move || {
            if let Some(id) = id.as_f64() {
                window().clear_timeout_with_handle(id as i32);
            }
        });
        handle
    }

    fn next_frame(&self, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let guarded = handle.guard(task);
        let callback = Closure::once_into_js(move || guarded());
        match window().request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => handle.set_canceller(move || {
                let _ = window().cancel_animation_frame(id);
            }),
            Err(e) => tracing::warn!("requestAnimationFrame failed: {e:?}"),
        }
        handle
    }

    fn now_ms(&self) -> f64 {
        window()
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}
