//! Notification widget: the DOM half of `pf_core::notify`.
//!
//! Builds the toast with text nodes (the message is never parsed as HTML),
//! injects the shared stylesheet on first use and toggles `show` for the
//! slide-in transition. Close-button listeners live as long as their node.

use std::cell::RefCell;

use gloo_utils::{body, head};
use pf_core::notify::Notification;
use pf_core::{NotificationKind, PortfolioError, Toast, ToastHost, Toaster};
use web_sys::Element;

use crate::dom;
use crate::events::HandlerTable;
use crate::state;
use crate::timers::BrowserScheduler;

pub type DomToaster = Toaster<BrowserScheduler, DomToastHost>;
pub type DomToast = Toast<BrowserScheduler, DomToastHost>;

const STYLE_ID: &str = "notification-styles";

const STYLES: &str = r#"
.notification {
    position: fixed;
    top: 20px;
    right: 20px;
    background: var(--color-surface);
    border-radius: var(--radius-lg);
    box-shadow: var(--shadow-xl);
    border: 1px solid var(--color-border-light);
    z-index: 9999;
    opacity: 0;
    transform: translateX(100%);
    transition: all 0.3s ease;
    max-width: 400px;
    min-width: 300px;
}
.notification.show { opacity: 1; transform: translateX(0); }
.notification-success { border-left: 4px solid var(--color-success); }
.notification-error { border-left: 4px solid var(--color-error); }
.notification-warning { border-left: 4px solid var(--color-warning); }
.notification-info { border-left: 4px solid var(--color-primary); }
.notification-content { padding: 16px; display: flex; align-items: center; gap: 12px; }
.notification-content i:first-child { font-size: 18px; color: var(--color-primary); }
.notification-success .notification-content i:first-child { color: var(--color-success); }
.notification-error .notification-content i:first-child { color: var(--color-error); }
.notification-warning .notification-content i:first-child { color: var(--color-warning); }
.notification-message { flex: 1; font-weight: 500; color: var(--color-text-primary); line-height: 1.5; }
.notification-close {
    background: none;
    border: none;
    font-size: 14px;
    cursor: pointer;
    color: var(--color-text-secondary);
    padding: 4px;
    border-radius: var(--radius-base);
    transition: all 0.15s;
}
.notification-close:hover { color: var(--color-text-primary); background: var(--color-surface-elevated); }
"#;

#[derive(Default)]
pub struct DomToastHost {
    closers: RefCell<Vec<(Element, HandlerTable)>>,
}

impl DomToastHost {
    /// Drop the close listeners of every node matching `released`.
    fn release(&self, released: impl Fn(&Element) -> bool) {
        let gone = {
            let mut closers = self.closers.borrow_mut();
            let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *closers)
                .into_iter()
                .partition(|(node, _)| released(node));
            *closers = kept;
            gone
        };
        drop(gone);
    }
}

fn element(tag: &str, class: &str) -> Result<Element, PortfolioError> {
    let el = dom::create_element(tag)?;
    el.set_class_name(class);
    Ok(el)
}

fn append(parent: &Element, child: &Element) -> Result<(), PortfolioError> {
    parent.append_child(child).map(|_| ()).map_err(PortfolioError::js)
}

impl ToastHost for DomToastHost {
    type Node = Element;

    fn clear_all(&self) {
        for existing in dom::query_all(".notification") {
            existing.remove();
        }
        self.release(|_| true);
    }

    fn ensure_styles(&self) {
        if dom::by_id(STYLE_ID).is_some() {
            return;
        }
        let style = match dom::create_element("style") {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("notification styles not injected: {e}");
                return;
            }
        };
        style.set_id(STYLE_ID);
        style.set_text_content(Some(STYLES));
        if let Err(e) = head().append_child(&style) {
            tracing::warn!("notification styles not injected: {e:?}");
        }
    }

    fn mount(&self, n: &Notification) -> Result<Element, PortfolioError> {
        let container = element("div", &n.class_name())?;
        let content = element("div", "notification-content")?;
        let icon = element("i", n.kind.icon_class())?;
        let message = element("span", "notification-message")?;
        message.set_text_content(Some(&n.message));
        let close = element("button", "notification-close")?;
        close
            .set_attribute("aria-label", "Close notification")
            .map_err(PortfolioError::js)?;
        append(&close, &element("i", "fas fa-times")?)?;

        append(&content, &icon)?;
        append(&content, &message)?;
        append(&content, &close)?;
        append(&container, &content)?;
        body().append_child(&container).map_err(PortfolioError::js)?;
        Ok(container)
    }

    fn bind_close(&self, node: &Element, mut on_close: Box<dyn FnMut()>) {
        let Some(close) = node.query_selector(".notification-close").ok().flatten() else {
            return;
        };
        let mut table = HandlerTable::default();
        let wired = table.on(&close, "click", move |_| on_close()).map(|_| ());
        match wired {
            Ok(()) => self.closers.borrow_mut().push((node.clone(), table)),
            Err(e) => tracing::warn!("close button not wired: {e}"),
        }
    }

    fn set_shown(&self, node: &Element, shown: bool) {
        dom::toggle_class(node, "show", shown);
    }

    fn is_attached(&self, node: &Element) -> bool {
        dom::is_attached(node)
    }

    fn detach(&self, node: &Element) {
        node.remove();
        self.release(|n| n == node);
    }
}

pub fn new_toaster(auto_hide_ms: u32, exit_ms: u32) -> DomToaster {
    Toaster::new(DomToastHost::default(), BrowserScheduler, auto_hide_ms, exit_ms)
}

/// Show a notification, replacing whatever is on screen.
pub fn show(message: &str, kind: NotificationKind) {
    if let Err(e) = state::toaster().notify(message, kind) {
        tracing::error!("notification failed: {e}");
    }
}
