//! Typewriter effect: type a phrase one character at a time, pause, delete it,
//! move on to the next phrase, forever.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::Timings;
use crate::error::{PortfolioError, Result};
use crate::schedule::{Scheduler, TaskHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingMode {
    Typing,
    Deleting,
}

/// Outcome of one step: what to display and how long to wait before the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypingStep {
    pub text: String,
    pub next_delay_ms: u32,
}

#[derive(Clone, Debug)]
pub struct TypingState {
    phrases: Vec<Vec<char>>,
    index: usize,
    offset: usize,
    mode: TypingMode,
    type_ms: u32,
    delete_ms: u32,
    pause_ms: u32,
}

impl TypingState {
    pub fn new(phrases: &[String], timings: &Timings) -> Result<Self> {
        let phrases: Vec<Vec<char>> = phrases
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.chars().collect())
            .collect();
        if phrases.is_empty() {
            return Err(PortfolioError::InvalidConfig(
                "typing effect needs at least one non-empty phrase".into(),
            ));
        }
        Ok(Self {
            phrases,
            index: 0,
            offset: 0,
            mode: TypingMode::Typing,
            type_ms: timings.type_ms,
            delete_ms: timings.delete_ms,
            pause_ms: timings.pause_ms,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn mode(&self) -> TypingMode {
        self.mode
    }

    fn current(&self) -> &[char] {
        &self.phrases[self.index]
    }

    pub fn text(&self) -> String {
        self.current()[..self.offset].iter().collect()
    }

    pub fn step(&mut self) -> TypingStep {
        let len = self.current().len();
        let next_delay_ms = match self.mode {
            TypingMode::Typing => {
                self.offset = (self.offset + 1).min(len);
                if self.offset == len {
                    self.mode = TypingMode::Deleting;
                    self.pause_ms
                } else {
                    self.type_ms
                }
            }
            TypingMode::Deleting => {
                self.offset = self.offset.saturating_sub(1);
                if self.offset == 0 {
                    self.index = (self.index + 1) % self.phrases.len();
                    self.mode = TypingMode::Typing;
                    self.type_ms
                } else {
                    self.delete_ms
                }
            }
        };
        TypingStep {
            text: self.text(),
            next_delay_ms,
        }
    }
}

/// Run `state` on `sched`, handing each frame of text to `render`.
/// The first step runs immediately. Cancel the returned handle to stop.
pub fn start<S, F>(sched: &S, state: TypingState, render: F) -> TaskHandle
where
    S: Scheduler,
    F: FnMut(&str) + 'static,
{
    let handle = TaskHandle::new();
    let state = Rc::new(RefCell::new(state));
    let render: Rc<RefCell<dyn FnMut(&str)>> = Rc::new(RefCell::new(render));
    tick(sched.clone(), state, render, handle.clone());
    handle
}

fn tick<S: Scheduler>(
    sched: S,
    state: Rc<RefCell<TypingState>>,
    render: Rc<RefCell<dyn FnMut(&str)>>,
    handle: TaskHandle,
) {
    if handle.is_cancelled() {
        return;
    }
    let step = state.borrow_mut().step();
    (&mut *render.borrow_mut())(&step.text);

    let next = sched.clone();
    let guard = handle.clone();
    let pending = sched.schedule(
        step.next_delay_ms,
        Box::new(move || tick(next, state, render, guard)),
    );
    handle.set_canceller(move || pending.cancel());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::VirtualScheduler;

    fn state(phrases: &[&str]) -> TypingState {
        let phrases: Vec<String> = phrases.iter().map(|s| s.to_string()).collect();
        TypingState::new(&phrases, &Timings::default()).expect("phrases")
    }

    #[test]
    fn forward_steps_reveal_prefixes() {
        let mut s = state(&["Rust", "Go"]);
        let texts: Vec<String> = (0..4).map(|_| s.step().text).collect();
        assert_eq!(texts, ["R", "Ru", "Rus", "Rust"]);
        assert_eq!(s.mode(), TypingMode::Deleting);
    }

    #[test]
    fn full_phrase_pauses_then_deletes_faster() {
        let mut s = state(&["ab"]);
        assert_eq!(s.step().next_delay_ms, 100);
        assert_eq!(s.step().next_delay_ms, 1000);
        let shrink = s.step();
        assert_eq!(shrink.text, "a");
        assert_eq!(shrink.next_delay_ms, 50);
    }

    #[test]
    fn empty_text_advances_phrase_modulo_count() {
        let mut s = state(&["ab", "c"]);
        for _ in 0..4 {
            s.step();
        }
        assert_eq!(s.index(), 1);
        assert_eq!(s.offset(), 0);
        assert_eq!(s.mode(), TypingMode::Typing);

        // "c": type one, delete one, wrap back to 0
        s.step();
        s.step();
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn offset_stays_within_phrase_bounds() {
        let mut s = state(&["héllo", "x"]);
        for _ in 0..50 {
            s.step();
            assert!(s.offset() <= s.current().len());
        }
    }

    #[test]
    fn multibyte_phrases_step_by_character() {
        let mut s = state(&["日本"]);
        assert_eq!(s.step().text, "日");
        assert_eq!(s.step().text, "日本");
    }

    #[test]
    fn rejects_empty_phrase_list() {
        let phrases = vec![String::new()];
        assert!(TypingState::new(&phrases, &Timings::default()).is_err());
    }

    #[test]
    fn runs_on_scheduler_until_cancelled() {
        let sched = VirtualScheduler::new();
        let shown = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = shown.clone();
        let handle = start(&sched, state(&["ab"]), move |t| sink.borrow_mut().push(t.to_string()));

        assert_eq!(*shown.borrow(), ["a"]);
        sched.advance(100);
        assert_eq!(*shown.borrow(), ["a", "ab"]);
        sched.advance(999);
        assert_eq!(shown.borrow().len(), 2);
        sched.advance(1);
        assert_eq!(shown.borrow().last().map(String::as_str), Some("a"));

        handle.cancel();
        sched.advance(10_000);
        assert_eq!(shown.borrow().len(), 3);
        assert_eq!(sched.pending(), 0);
    }
}
