//! Event registration.
//!
//! Each controller owns a `HandlerTable` (event kind → handler) instead of
//! leaking its closures, so the whole page can be torn down: dropping a
//! `Registration` removes its listener.

use pf_core::schedule::Task;
use pf_core::{PortfolioError, TaskHandle};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

pub struct Registration {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

#[derive(Default)]
pub struct HandlerTable {
    entries: Vec<Registration>,
}

impl HandlerTable {
    pub fn on(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<&mut Self, PortfolioError> {
        self.add(target, kind, false, Box::new(handler))
    }

    /// Passive listener, for scroll.
    pub fn on_passive(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<&mut Self, PortfolioError> {
        self.add(target, kind, true, Box::new(handler))
    }

    fn add(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: Box<dyn FnMut(Event)>,
    ) -> Result<&mut Self, PortfolioError> {
        let callback = Closure::wrap(handler);
        let opts = AddEventListenerOptions::new();
        opts.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &opts,
            )
            .map_err(PortfolioError::js)?;
        self.entries.push(Registration {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Everything one initializer set up: its listeners, its timers and any
/// extra cleanup.
pub struct Controller {
    pub name: &'static str,
    pub handlers: HandlerTable,
    life: TaskHandle,
    tasks: Vec<TaskHandle>,
    cleanup: Vec<Box<dyn FnOnce()>>,
}

impl Controller {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: HandlerTable::default(),
            life: TaskHandle::new(),
            tasks: Vec::new(),
            cleanup: Vec::new(),
        }
    }

    /// Handle cancelled when the controller shuts down.
    pub fn life(&self) -> TaskHandle {
        self.life.clone()
    }

    /// Make `task` a no-op once the controller has shut down.
    pub fn guard(&self, task: Task) -> Task {
        self.life.guard(task)
    }

    pub fn track(&mut self, handle: TaskHandle) {
        self.tasks.push(handle);
    }

    pub fn on_shutdown(&mut self, f: impl FnOnce() + 'static) {
        self.cleanup.push(Box::new(f));
    }

    pub fn shutdown(self) {
        self.life.cancel();
        for task in &self.tasks {
            task.cancel();
        }
        for f in self.cleanup {
            f();
        }
        tracing::debug!(
            controller = self.name,
            listeners = self.handlers.len(),
            "controller shut down"
        );
    }
}
