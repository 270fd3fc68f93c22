//! Cancellable scheduling.
//!
//! Controllers never touch `setTimeout` / `requestAnimationFrame` directly;
//! they go through [`Scheduler`] so the browser can supply real timers and
//! tests can supply [`VirtualScheduler`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct HandleInner {
    cancelled: Cell<bool>,
    canceller: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Handle to a scheduled task. Clones share the same cancellation state.
#[derive(Clone, Default)]
pub struct TaskHandle {
    inner: Rc<HandleInner>,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook run once on the first `cancel()`, used to release host timers.
    pub fn set_canceller(&self, f: impl FnOnce() + 'static) {
        *self.inner.canceller.borrow_mut() = Some(Box::new(f));
    }

    pub fn cancel(&self) {
        if self.inner.cancelled.replace(true) {
            return;
        }
        let canceller = self.inner.canceller.borrow_mut().take();
        if let Some(f) = canceller {
            f();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Wrap `task` so it becomes a no-op once this handle is cancelled.
    pub fn guard(&self, task: Task) -> Task {
        let handle = self.clone();
        Box::new(move || {
            if !handle.is_cancelled() {
                task();
            }
        })
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

pub trait Scheduler: Clone + 'static {
    /// Run `task` once after `delay_ms`.
    fn schedule(&self, delay_ms: u32, task: Task) -> TaskHandle;

    /// Run `task` before the next paint.
    fn next_frame(&self, task: Task) -> TaskHandle;

    /// Monotonic milliseconds.
    fn now_ms(&self) -> f64;
}

struct Pending {
    due: u64,
    seq: u64,
    handle: TaskHandle,
    task: Task,
}

struct Timeline {
    now: u64,
    seq: u64,
    frame_ms: u64,
    queue: Vec<Pending>,
}

/// Deterministic clock. Time only moves when `advance*` is called; due tasks
/// run in (due time, insertion order) and may schedule more tasks.
#[derive(Clone)]
pub struct VirtualScheduler {
    timeline: Rc<RefCell<Timeline>>,
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::with_frame_ms(16)
    }
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_ms(frame_ms: u64) -> Self {
        Self {
            timeline: Rc::new(RefCell::new(Timeline {
                now: 0,
                seq: 0,
                frame_ms,
                queue: Vec::new(),
            })),
        }
    }

    pub fn now(&self) -> u64 {
        self.timeline.borrow().now
    }

    /// Tasks still waiting to run.
    pub fn pending(&self) -> usize {
        self.timeline
            .borrow()
            .queue
            .iter()
            .filter(|p| !p.handle.is_cancelled())
            .count()
    }

    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;
        while let Some(p) = self.pop_due(target) {
            (p.task)();
        }
        let mut t = self.timeline.borrow_mut();
        t.now = t.now.max(target);
    }

    pub fn advance_frame(&self) {
        let frame = self.timeline.borrow().frame_ms;
        self.advance(frame);
    }

    fn push(&self, delay: u64, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut t = self.timeline.borrow_mut();
        let due = t.now + delay;
        let seq = t.seq;
        t.seq += 1;
        t.queue.push(Pending {
            due,
            seq,
            handle: handle.clone(),
            task,
        });
        handle
    }

    fn pop_due(&self, target: u64) -> Option<Pending> {
        let mut t = self.timeline.borrow_mut();
        t.queue.retain(|p| !p.handle.is_cancelled());
        let idx = t
            .queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        let p = t.queue.remove(idx);
        t.now = p.due;
        Some(p)
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TaskHandle {
        self.push(u64::from(delay_ms), task)
    }

    fn next_frame(&self, task: Task) -> TaskHandle {
        let frame = self.timeline.borrow().frame_ms;
        self.push(frame, task)
    }

    fn now_ms(&self) -> f64 {
        self.now() as f64
    }
}
