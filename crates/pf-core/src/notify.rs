//! Transient notification ("toast") lifecycle.
//!
//! The lifecycle lives here; the DOM work sits behind [`ToastHost`].
//! At most one notification exists at a time: every `notify` clears whatever
//! is on screen before mounting the new one.
//!
//! Phases: `Mounted` → `Shown` (next frame) → `Leaving` (auto-hide or close)
//! → `Removed` (after the exit transition).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schedule::{Scheduler, TaskHandle};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Unknown kinds fall back to `Info`.
    pub fn parse_lossy(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Success => "fas fa-check-circle",
            Self::Error => "fas fa-exclamation-circle",
            Self::Warning => "fas fa-exclamation-triangle",
            Self::Info => "fas fa-info-circle",
        }
    }

    pub fn css_class(self) -> String {
        format!("notification-{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Full class attribute of the container.
    pub fn class_name(&self) -> String {
        format!("notification {}", self.kind.css_class())
    }
}

/// Text of the diagnostic shown for an uncaught page error. The thrown
/// error's own message wins; the event message (which browsers prefix with
/// "Uncaught ...") is only used when no error object is available, as for
/// cross-origin scripts.
pub fn error_notice(error_message: Option<&str>, event_message: &str) -> String {
    format!("Error: {}", error_message.unwrap_or(event_message))
}

/// DOM side of the notification widget.
pub trait ToastHost: 'static {
    type Node: Clone + 'static;

    /// Remove every notification currently in the document, without fading.
    /// Releases every handler bound with `bind_close`.
    fn clear_all(&self);
    /// Inject the shared stylesheet unless it is already present.
    fn ensure_styles(&self);
    /// Build the notification and attach it to the document.
    fn mount(&self, notification: &Notification) -> Result<Self::Node>;
    /// Route clicks on the node's close control to `on_close` until the node
    /// is detached or cleared.
    fn bind_close(&self, node: &Self::Node, on_close: Box<dyn FnMut()>);
    fn set_shown(&self, node: &Self::Node, shown: bool);
    fn is_attached(&self, node: &Self::Node) -> bool;
    /// Remove the node and release its close handler.
    fn detach(&self, node: &Self::Node);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    Mounted,
    Shown,
    Leaving,
    Removed,
}

struct ToastInner<S: Scheduler, H: ToastHost> {
    node: H::Node,
    host: Rc<H>,
    sched: S,
    exit_ms: u32,
    phase: Cell<ToastPhase>,
    auto_hide: RefCell<Option<TaskHandle>>,
}

/// A mounted notification. Clones refer to the same node.
pub struct Toast<S: Scheduler, H: ToastHost> {
    inner: Rc<ToastInner<S, H>>,
}

impl<S: Scheduler, H: ToastHost> Clone for Toast<S, H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Scheduler, H: ToastHost> Toast<S, H> {
    pub fn phase(&self) -> ToastPhase {
        self.inner.phase.get()
    }

    pub fn node(&self) -> &H::Node {
        &self.inner.node
    }

    /// Start the exit transition and remove the node once it finishes.
    /// Calling this again while leaving (or after removal) does nothing.
    pub fn dismiss(&self) {
        match self.phase() {
            ToastPhase::Leaving | ToastPhase::Removed => return,
            ToastPhase::Mounted | ToastPhase::Shown => {}
        }
        self.inner.phase.set(ToastPhase::Leaving);
        if let Some(handle) = self.inner.auto_hide.borrow_mut().take() {
            handle.cancel();
        }
        self.inner.host.set_shown(&self.inner.node, false);

        let toast = self.clone();
        self.inner.sched.schedule(
            self.inner.exit_ms,
            Box::new(move || toast.remove_now()),
        );
    }

    fn remove_now(&self) {
        if self.inner.host.is_attached(&self.inner.node) {
            self.inner.host.detach(&self.inner.node);
        }
        self.retire();
    }

    /// Forget the toast without touching the DOM (someone else removed it).
    fn retire(&self) {
        self.inner.phase.set(ToastPhase::Removed);
        if let Some(handle) = self.inner.auto_hide.borrow_mut().take() {
            handle.cancel();
        }
    }
}

pub struct Toaster<S: Scheduler, H: ToastHost> {
    host: Rc<H>,
    sched: S,
    auto_hide_ms: u32,
    exit_ms: u32,
    current: Rc<RefCell<Option<Toast<S, H>>>>,
}

impl<S: Scheduler, H: ToastHost> Clone for Toaster<S, H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            sched: self.sched.clone(),
            auto_hide_ms: self.auto_hide_ms,
            exit_ms: self.exit_ms,
            current: self.current.clone(),
        }
    }
}

impl<S: Scheduler, H: ToastHost> Toaster<S, H> {
    pub fn new(host: H, sched: S, auto_hide_ms: u32, exit_ms: u32) -> Self {
        Self {
            host: Rc::new(host),
            sched,
            auto_hide_ms,
            exit_ms,
            current: Rc::new(RefCell::new(None)),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The notification on screen, if any.
    pub fn current(&self) -> Option<Toast<S, H>> {
        self.current
            .borrow()
            .as_ref()
            .filter(|t| t.phase() != ToastPhase::Removed)
            .cloned()
    }

    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> Result<Toast<S, H>> {
        let notification = Notification::new(message, kind);

        if let Some(previous) = self.current.borrow_mut().take() {
            previous.retire();
        }
        self.host.clear_all();
        self.host.ensure_styles();

        let node = self.host.mount(&notification)?;
        let toast = Toast {
            inner: Rc::new(ToastInner {
                node,
                host: self.host.clone(),
                sched: self.sched.clone(),
                exit_ms: self.exit_ms,
                phase: Cell::new(ToastPhase::Mounted),
                auto_hide: RefCell::new(None),
            }),
        };

        // Show on the next frame so the entrance transition is not coalesced
        // with the insertion.
        let entering = toast.clone();
        self.sched.next_frame(Box::new(move || {
            if entering.phase() == ToastPhase::Mounted {
                entering.inner.host.set_shown(&entering.inner.node, true);
                entering.inner.phase.set(ToastPhase::Shown);
            }
        }));

        let closing = toast.clone();
        self.host
            .bind_close(&toast.inner.node, Box::new(move || closing.dismiss()));

        let expiring = toast.clone();
        let handle = self
            .sched
            .schedule(self.auto_hide_ms, Box::new(move || expiring.dismiss()));
        *toast.inner.auto_hide.borrow_mut() = Some(handle);

        tracing::debug!(kind = kind.as_str(), "notification shown");
        *self.current.borrow_mut() = Some(toast.clone());
        Ok(toast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::VirtualScheduler;

    #[derive(Debug, Clone)]
    struct FakeNode {
        message: String,
        class_name: String,
        icon: &'static str,
        shown: bool,
    }

    /// In-memory document: a list of attached nodes addressed by id.
    #[derive(Default)]
    struct MemoryHost {
        nodes: RefCell<Vec<(usize, FakeNode)>>,
        next_id: Cell<usize>,
        styles_injected: Cell<u32>,
        close_handlers: RefCell<Vec<(usize, Box<dyn FnMut()>)>>,
    }

    impl MemoryHost {
        fn attached(&self) -> Vec<FakeNode> {
            self.nodes.borrow().iter().map(|(_, n)| n.clone()).collect()
        }

        fn click_close(&self, id: usize) {
            let mut handlers = self.close_handlers.borrow_mut();
            if let Some((_, h)) = handlers.iter_mut().find(|(i, _)| *i == id) {
                h();
            }
        }
    }

    impl ToastHost for MemoryHost {
        type Node = usize;

        fn clear_all(&self) {
            self.nodes.borrow_mut().clear();
            self.close_handlers.borrow_mut().clear();
        }

        fn ensure_styles(&self) {
            if self.styles_injected.get() == 0 {
                self.styles_injected.set(1);
            }
        }

        fn mount(&self, n: &Notification) -> Result<usize> {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.nodes.borrow_mut().push((
                id,
                FakeNode {
                    message: n.message.clone(),
                    class_name: n.class_name(),
                    icon: n.kind.icon_class(),
                    shown: false,
                },
            ));
            Ok(id)
        }

        fn bind_close(&self, node: &usize, on_close: Box<dyn FnMut()>) {
            self.close_handlers.borrow_mut().push((*node, on_close));
        }

        fn set_shown(&self, node: &usize, shown: bool) {
            if let Some((_, n)) = self.nodes.borrow_mut().iter_mut().find(|(i, _)| i == node) {
                n.shown = shown;
            }
        }

        fn is_attached(&self, node: &usize) -> bool {
            self.nodes.borrow().iter().any(|(i, _)| i == node)
        }

        fn detach(&self, node: &usize) {
            self.nodes.borrow_mut().retain(|(i, _)| i != node);
            self.close_handlers.borrow_mut().retain(|(i, _)| i != node);
        }
    }

    fn toaster() -> (Toaster<VirtualScheduler, MemoryHost>, VirtualScheduler) {
        let sched = VirtualScheduler::new();
        (Toaster::new(MemoryHost::default(), sched.clone(), 5000, 300), sched)
    }

    #[test]
    fn each_kind_mounts_one_node_with_its_icon() {
        let (toaster, _sched) = toaster();
        for kind in [
            NotificationKind::Success,
            NotificationKind::Error,
            NotificationKind::Warning,
            NotificationKind::Info,
        ] {
            toaster.notify("hello", kind).expect("mount");
            let nodes = toaster.host().attached();
            assert_eq!(nodes.len(), 1);
            assert_eq!(nodes[0].message, "hello");
            assert_eq!(nodes[0].icon, kind.icon_class());
            assert_eq!(nodes[0].class_name, format!("notification notification-{}", kind.as_str()));
        }
    }

    #[test]
    fn unknown_kind_uses_info_icon() {
        let kind = NotificationKind::parse_lossy("celebration");
        assert_eq!(kind, NotificationKind::Info);
        assert_eq!(kind.icon_class(), "fas fa-info-circle");
        assert_eq!(NotificationKind::parse_lossy(" Warning "), NotificationKind::Warning);
    }

    #[test]
    fn error_notice_prefers_the_thrown_message() {
        assert_eq!(
            error_notice(Some("x is not a function"), "Uncaught TypeError: x is not a function"),
            "Error: x is not a function"
        );
        assert_eq!(error_notice(None, "Script error."), "Error: Script error.");
    }

    #[test]
    fn successive_calls_keep_only_the_latest() {
        let (toaster, sched) = toaster();
        let first = toaster.notify("one", NotificationKind::Info).expect("mount");
        toaster.notify("two", NotificationKind::Success).expect("mount");

        let nodes = toaster.host().attached();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].message, "two");
        assert_eq!(first.phase(), ToastPhase::Removed);

        // The first toast's timers must not disturb the second.
        sched.advance(16);
        assert!(toaster.host().attached()[0].shown);
        sched.advance(5000 - 16 + 300);
        assert!(toaster.host().attached().is_empty());
    }

    #[test]
    fn replaced_and_removed_toasts_are_released() {
        let (toaster, sched) = toaster();
        let first = toaster.notify("one", NotificationKind::Info).expect("mount");
        sched.advance_frame();
        toaster.notify("two", NotificationKind::Info).expect("mount");
        sched.advance(1);
        assert_eq!(Rc::strong_count(&first.inner), 1);

        let second = toaster.current().expect("on screen");
        second.dismiss();
        sched.advance(300);
        assert_eq!(second.phase(), ToastPhase::Removed);
        // `second` plus the toaster's own slot; no handler still holds it.
        assert_eq!(Rc::strong_count(&second.inner), 2);
        assert!(toaster.host().close_handlers.borrow().is_empty());
    }

    #[test]
    fn styles_are_injected_once() {
        let (toaster, _sched) = toaster();
        toaster.notify("a", NotificationKind::Info).expect("mount");
        toaster.notify("b", NotificationKind::Info).expect("mount");
        assert_eq!(toaster.host().styles_injected.get(), 1);
    }

    #[test]
    fn shows_on_next_frame_then_auto_hides() {
        let (toaster, sched) = toaster();
        let toast = toaster.notify("hi", NotificationKind::Info).expect("mount");
        assert_eq!(toast.phase(), ToastPhase::Mounted);
        assert!(!toaster.host().attached()[0].shown);

        sched.advance_frame();
        assert_eq!(toast.phase(), ToastPhase::Shown);
        assert!(toaster.host().attached()[0].shown);

        sched.advance(5000 - 16);
        assert_eq!(toast.phase(), ToastPhase::Leaving);
        assert!(!toaster.host().attached()[0].shown);
        assert_eq!(toaster.host().attached().len(), 1);

        sched.advance(300);
        assert_eq!(toast.phase(), ToastPhase::Removed);
        assert!(toaster.host().attached().is_empty());
        assert!(toaster.current().is_none());
    }

    #[test]
    fn close_button_dismisses_early_and_cancels_auto_hide() {
        let (toaster, sched) = toaster();
        let toast = toaster.notify("bye", NotificationKind::Warning).expect("mount");
        sched.advance_frame();

        toaster.host().click_close(*toast.node());
        toaster.host().click_close(*toast.node());
        assert_eq!(toast.phase(), ToastPhase::Leaving);

        sched.advance(300);
        assert!(toaster.host().attached().is_empty());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn dismiss_twice_and_after_removal_is_harmless() {
        let (toaster, sched) = toaster();
        let toast = toaster.notify("x", NotificationKind::Error).expect("mount");
        toast.dismiss();
        toast.dismiss();
        sched.advance(300);
        toast.dismiss();
        sched.advance(1000);
        assert!(toaster.host().attached().is_empty());
        assert_eq!(toast.phase(), ToastPhase::Removed);
    }

    #[test]
    fn dismiss_before_first_frame_never_shows() {
        let (toaster, sched) = toaster();
        let toast = toaster.notify("quick", NotificationKind::Info).expect("mount");
        toast.dismiss();
        sched.advance_frame();
        assert_eq!(toast.phase(), ToastPhase::Leaving);
        sched.advance(300);
        assert_eq!(toast.phase(), ToastPhase::Removed);
    }

    #[test]
    fn removal_skips_nodes_already_detached() {
        let (toaster, sched) = toaster();
        let toast = toaster.notify("gone", NotificationKind::Info).expect("mount");
        toast.dismiss();
        toaster.host().clear_all();
        sched.advance(300);
        assert_eq!(toast.phase(), ToastPhase::Removed);
    }
}
