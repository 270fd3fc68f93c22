//! Contact form: the submit sequence, button presentation and field
//! validation.
//!
//! There is no real backend. [`SimulatedTransport`] waits and reports
//! success; [`SubmitFlow`] drives the button through
//! `Idle → Sending → Sent|Failed → Idle` on a [`Scheduler`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::Result;
use crate::notify::NotificationKind;
use crate::schedule::{Scheduler, TaskHandle};

pub const SENT_MESSAGE: &str = "Thank you! Your message has been sent successfully.";
pub const FAILED_MESSAGE: &str = "Failed to send message. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Sending,
    Sent,
    Failed,
}

impl SubmitPhase {
    /// Button label for this phase; `Idle` restores the original label.
    pub fn label<'a>(self, original: &'a str) -> &'a str {
        match self {
            Self::Idle => original,
            Self::Sending => "Sending...",
            Self::Sent => "Message Sent!",
            Self::Failed => "Send Failed",
        }
    }

    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Idle => "fas fa-paper-plane btn-icon",
            Self::Sending => "fas fa-spinner fa-spin btn-icon",
            Self::Sent => "fas fa-check btn-icon",
            Self::Failed => "fas fa-exclamation-triangle btn-icon",
        }
    }

    pub fn disabled(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid,
}

impl Validity {
    pub fn class(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldRules {
    pub email: bool,
    pub required: bool,
}

/// Blur-time verdict for one field; `None` means neither class applies.
/// A malformed email stays invalid even if the field is required and filled.
pub fn validate_field(rules: FieldRules, raw: &str) -> Option<Validity> {
    let value = raw.trim();
    let email = (rules.email && !value.is_empty()).then(|| {
        if is_plausible_email(value) {
            Validity::Valid
        } else {
            Validity::Invalid
        }
    });
    let required = rules.required.then(|| {
        if value.is_empty() {
            Validity::Invalid
        } else {
            Validity::Valid
        }
    });
    match (email, required) {
        (Some(Validity::Invalid), _) | (_, Some(Validity::Invalid)) => Some(Validity::Invalid),
        (None, None) => None,
        _ => Some(Validity::Valid),
    }
}

/// `local@domain.tld` shape: no whitespace, one `@`, and a dot in the domain
/// with text on both sides.
pub fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .match_indices('.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

/// Page side of the form.
pub trait SubmitView: 'static {
    fn render(&self, phase: SubmitPhase);
    fn reset_form(&self);
    fn announce(&self, message: &str, kind: NotificationKind);
}

/// Where a submitted form goes. `done` receives the outcome; the returned
/// handle cancels a delivery still in flight.
pub trait Transport: 'static {
    fn deliver(&self, done: Box<dyn FnOnce(Result<()>)>) -> TaskHandle;
}

/// Waits `delay_ms`, then succeeds.
pub struct SimulatedTransport<S: Scheduler> {
    sched: S,
    delay_ms: u32,
}

impl<S: Scheduler> SimulatedTransport<S> {
    pub fn new(sched: S, delay_ms: u32) -> Self {
        Self { sched, delay_ms }
    }
}

impl<S: Scheduler> Transport for SimulatedTransport<S> {
    fn deliver(&self, done: Box<dyn FnOnce(Result<()>)>) -> TaskHandle {
        self.sched.schedule(self.delay_ms, Box::new(move || done(Ok(()))))
    }
}

struct FlowInner<S: Scheduler, V: SubmitView, T: Transport> {
    sched: S,
    view: V,
    transport: T,
    reset_ms: u32,
    phase: Cell<SubmitPhase>,
    pending: RefCell<Option<TaskHandle>>,
}

/// One contact form's submit sequence.
pub struct SubmitFlow<S: Scheduler, V: SubmitView, T: Transport> {
    inner: Rc<FlowInner<S, V, T>>,
}

impl<S: Scheduler, V: SubmitView, T: Transport> Clone for SubmitFlow<S, V, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Scheduler, V: SubmitView, T: Transport> SubmitFlow<S, V, T> {
    pub fn new(sched: S, view: V, transport: T, reset_ms: u32) -> Self {
        Self {
            inner: Rc::new(FlowInner {
                sched,
                view,
                transport,
                reset_ms,
                phase: Cell::new(SubmitPhase::Idle),
                pending: RefCell::new(None),
            }),
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.inner.phase.get()
    }

    pub fn view(&self) -> &V {
        &self.inner.view
    }

    /// Start a submission. Returns false, doing nothing, while one is
    /// already running.
    pub fn submit(&self) -> bool {
        if self.phase() != SubmitPhase::Idle {
            tracing::debug!("submit ignored, form busy");
            return false;
        }
        self.enter(SubmitPhase::Sending);

        let flow = self.clone();
        let handle = self
            .inner
            .transport
            .deliver(Box::new(move |outcome| flow.delivered(outcome)));
        // A transport may answer synchronously; keep the reset timer then.
        if self.phase() == SubmitPhase::Sending {
            self.track(handle);
        }
        true
    }

    /// Stop any pending delivery or reset.
    pub fn cancel(&self) {
        if let Some(handle) = self.inner.pending.borrow_mut().take() {
            handle.cancel();
        }
    }

    fn delivered(&self, outcome: Result<()>) {
        let view = &self.inner.view;
        match outcome {
            Ok(()) => {
                self.enter(SubmitPhase::Sent);
                view.reset_form();
                view.announce(SENT_MESSAGE, NotificationKind::Success);
            }
            Err(e) => {
                tracing::error!("contact form delivery failed: {e}");
                self.enter(SubmitPhase::Failed);
                view.announce(FAILED_MESSAGE, NotificationKind::Error);
            }
        }

        let flow = self.clone();
        let handle = self.inner.sched.schedule(
            self.inner.reset_ms,
            Box::new(move || flow.enter(SubmitPhase::Idle)),
        );
        self.track(handle);
    }

    fn enter(&self, phase: SubmitPhase) {
        self.inner.phase.set(phase);
        self.inner.view.render(phase);
    }

    fn track(&self, handle: TaskHandle) {
        *self.inner.pending.borrow_mut() = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortfolioError;
    use crate::schedule::VirtualScheduler;

    /// Records everything the flow asks of the page.
    #[derive(Default)]
    struct RecordingView {
        events: RefCell<Vec<String>>,
    }

    impl SubmitView for RecordingView {
        fn render(&self, phase: SubmitPhase) {
            self.events
                .borrow_mut()
                .push(format!("{} [{}]", phase.label("Send Message"), phase.disabled()));
        }

        fn reset_form(&self) {
            self.events.borrow_mut().push("reset".into());
        }

        fn announce(&self, message: &str, kind: NotificationKind) {
            self.events
                .borrow_mut()
                .push(format!("{}: {message}", kind.as_str()));
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn deliver(&self, done: Box<dyn FnOnce(Result<()>)>) -> TaskHandle {
            done(Err(PortfolioError::Delivery("offline".into())));
            TaskHandle::new()
        }
    }

    fn simulated() -> (
        SubmitFlow<VirtualScheduler, RecordingView, SimulatedTransport<VirtualScheduler>>,
        VirtualScheduler,
    ) {
        let sched = VirtualScheduler::new();
        let transport = SimulatedTransport::new(sched.clone(), 2000);
        let flow = SubmitFlow::new(sched.clone(), RecordingView::default(), transport, 3000);
        (flow, sched)
    }

    #[test]
    fn submission_walks_through_every_phase() {
        let (flow, sched) = simulated();
        assert!(flow.submit());
        assert_eq!(*flow.view().events.borrow(), ["Sending... [true]"]);

        sched.advance(1999);
        assert_eq!(flow.phase(), SubmitPhase::Sending);
        sched.advance(1);
        assert_eq!(
            *flow.view().events.borrow(),
            [
                "Sending... [true]",
                "Message Sent! [true]",
                "reset",
                "success: Thank you! Your message has been sent successfully.",
            ]
        );

        sched.advance(2999);
        assert_eq!(flow.phase(), SubmitPhase::Sent);
        sched.advance(1);
        assert_eq!(flow.phase(), SubmitPhase::Idle);
        assert_eq!(
            flow.view().events.borrow().last().map(String::as_str),
            Some("Send Message [false]")
        );
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn second_submit_while_busy_is_ignored() {
        let (flow, sched) = simulated();
        assert!(flow.submit());
        assert!(!flow.submit());
        sched.advance(2000);
        assert!(!flow.submit());
        sched.advance(3000);

        let sent = flow
            .view()
            .events
            .borrow()
            .iter()
            .filter(|e| e.starts_with("success"))
            .count();
        assert_eq!(sent, 1);
        assert!(flow.submit());
    }

    #[test]
    fn failed_delivery_reports_and_recovers() {
        let sched = VirtualScheduler::new();
        let flow = SubmitFlow::new(sched.clone(), RecordingView::default(), FailingTransport, 3000);
        assert!(flow.submit());
        assert_eq!(flow.phase(), SubmitPhase::Failed);
        assert_eq!(
            *flow.view().events.borrow(),
            [
                "Sending... [true]",
                "Send Failed [true]",
                "error: Failed to send message. Please try again.",
            ]
        );
        sched.advance(3000);
        assert_eq!(flow.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn cancel_stops_the_sequence() {
        let (flow, sched) = simulated();
        flow.submit();
        flow.cancel();
        sched.advance(10_000);
        assert_eq!(*flow.view().events.borrow(), ["Sending... [true]"]);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn button_presentation_per_phase() {
        assert_eq!(SubmitPhase::Sending.label("Send Message"), "Sending...");
        assert_eq!(SubmitPhase::Idle.label("Send Message"), "Send Message");
        assert_eq!(SubmitPhase::Sent.icon_class(), "fas fa-check btn-icon");
        assert!(SubmitPhase::Sending.disabled());
        assert!(!SubmitPhase::Idle.disabled());
    }

    #[test]
    fn email_shapes() {
        assert!(is_plausible_email("a@b.co"));
        assert!(is_plausible_email("first.last@mail.example.org"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("a@.com"));
        assert!(!is_plausible_email("a@b."));
        assert!(!is_plausible_email("@b.com"));
        assert!(!is_plausible_email("a@@b.com"));
        assert!(!is_plausible_email("a b@c.com"));
    }

    #[test]
    fn required_fields() {
        let rules = FieldRules { email: false, required: true };
        assert_eq!(validate_field(rules, "  "), Some(Validity::Invalid));
        assert_eq!(validate_field(rules, "Ada"), Some(Validity::Valid));
    }

    #[test]
    fn optional_email_is_only_checked_when_filled() {
        let rules = FieldRules { email: true, required: false };
        assert_eq!(validate_field(rules, ""), None);
        assert_eq!(validate_field(rules, "nope"), Some(Validity::Invalid));
        assert_eq!(validate_field(rules, "ada@lovelace.dev"), Some(Validity::Valid));
    }

    #[test]
    fn bad_required_email_stays_invalid() {
        let rules = FieldRules { email: true, required: true };
        assert_eq!(validate_field(rules, "not-an-email"), Some(Validity::Invalid));
    }

    #[test]
    fn unconstrained_field_has_no_verdict() {
        assert_eq!(validate_field(FieldRules::default(), "anything"), None);
    }
}
