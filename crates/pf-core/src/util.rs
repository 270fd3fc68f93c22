//! Debounce, throttle and timing helpers shared with inline page scripts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::schedule::{Scheduler, TaskHandle};

type Callback<A> = Rc<RefCell<dyn FnMut(A)>>;

/// Runs the wrapped function once calls stop arriving for `wait_ms`.
/// With `immediate`, runs on the leading edge instead and ignores the
/// trailing one.
pub struct Debounced<S: Scheduler, A> {
    sched: S,
    wait_ms: u32,
    immediate: bool,
    pending: Rc<RefCell<Option<TaskHandle>>>,
    func: Callback<A>,
}

impl<S: Scheduler, A: Clone + 'static> Debounced<S, A> {
    pub fn new(sched: S, wait_ms: u32, immediate: bool, func: impl FnMut(A) + 'static) -> Self {
        Self {
            sched,
            wait_ms,
            immediate,
            pending: Rc::new(RefCell::new(None)),
            func: Rc::new(RefCell::new(func)),
        }
    }

    pub fn call(&self, arg: A) {
        let call_now = self.immediate && self.pending.borrow().is_none();
        if let Some(previous) = self.pending.borrow_mut().take() {
            previous.cancel();
        }

        let pending = self.pending.clone();
        let func = self.func.clone();
        let trailing = (!self.immediate).then(|| arg.clone());
        let handle = self.sched.schedule(
            self.wait_ms,
            Box::new(move || {
                pending.borrow_mut().take();
                if let Some(arg) = trailing {
                    (&mut *func.borrow_mut())(arg);
                }
            }),
        );
        *self.pending.borrow_mut() = Some(handle);

        if call_now {
            (&mut *self.func.borrow_mut())(arg);
        }
    }

    /// Drop a pending trailing call.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            handle.cancel();
        }
    }
}

/// Runs the wrapped function at most once per `limit_ms`; calls inside the
/// window are dropped.
pub struct Throttled<S: Scheduler, A> {
    sched: S,
    limit_ms: u32,
    blocked: Rc<Cell<bool>>,
    func: Callback<A>,
}

impl<S: Scheduler, A: 'static> Throttled<S, A> {
    pub fn new(sched: S, limit_ms: u32, func: impl FnMut(A) + 'static) -> Self {
        Self {
            sched,
            limit_ms,
            blocked: Rc::new(Cell::new(false)),
            func: Rc::new(RefCell::new(func)),
        }
    }

    pub fn call(&self, arg: A) {
        if self.blocked.get() {
            return;
        }
        (&mut *self.func.borrow_mut())(arg);
        self.blocked.set(true);
        let blocked = self.blocked.clone();
        self.sched
            .schedule(self.limit_ms, Box::new(move || blocked.set(false)));
    }
}

/// Run `f`, log how long it took and return its result with the elapsed time.
pub fn measure<S: Scheduler, R>(sched: &S, name: &str, f: impl FnOnce() -> R) -> (R, f64) {
    let start = sched.now_ms();
    let result = f();
    let elapsed = sched.now_ms() - start;
    tracing::info!("{name} took {elapsed:.2} milliseconds");
    (result, elapsed)
}
