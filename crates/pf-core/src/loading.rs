//! Splash screen timing: hide after `reveal_ms`, then remove `remove_ms`
//! later unless something else already took it out of the document.

use crate::schedule::{Scheduler, TaskHandle};

/// DOM side of the splash screen.
pub trait Splash: 'static {
    /// Start the fade-out.
    fn hide(&self);
    fn is_attached(&self) -> bool;
    fn remove(&self);
}

/// Schedule both stages. Cancelling the handle stops whichever stage is
/// still pending.
pub fn dismiss_after<S, P>(sched: &S, splash: P, reveal_ms: u32, remove_ms: u32) -> TaskHandle
where
    S: Scheduler,
    P: Splash,
{
    let handle = TaskHandle::new();
    let next = sched.clone();
    let stage = handle.clone();
    let first = sched.schedule(
        reveal_ms,
        handle.guard(Box::new(move || {
            splash.hide();
            let second = next.schedule(
                remove_ms,
                stage.guard(Box::new(move || {
                    if splash.is_attached() {
                        splash.remove();
                    }
                })),
            );
            stage.set_canceller(move || second.cancel());
        })),
    );
    handle.set_canceller(move || first.cancel());
    handle
}
