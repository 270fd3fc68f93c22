//! DOM helpers and element bindings.
//!
//! Every element the page may provide is resolved once in `Elements::bind()`.
//! All of them are optional: a controller whose element is missing logs a
//! warning and does nothing.

use gloo_utils::{body, document, window};
use pf_core::PortfolioError;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlFormElement, ScrollBehavior, ScrollToOptions};

// ── Helpers ──

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    match document().query_selector_all(selector) {
        Ok(nl) => collect_nodes(&nl),
        Err(e) => {
            tracing::warn!("bad selector {selector}: {e:?}");
            Vec::new()
        }
    }
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    match parent.query_selector_all(selector) {
        Ok(nl) => collect_nodes(&nl),
        Err(e) => {
            tracing::warn!("bad selector {selector}: {e:?}");
            Vec::new()
        }
    }
}

fn collect_nodes(nl: &web_sys::NodeList) -> Vec<Element> {
    (0..nl.length())
        .filter_map(|i| nl.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

/// Direct element children, in document order.
pub fn children(el: &Element) -> Vec<Element> {
    let kids = el.children();
    (0..kids.length()).filter_map(|i| kids.item(i)).collect()
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}

pub fn create_element(tag: &str) -> Result<Element, PortfolioError> {
    document().create_element(tag).map_err(PortfolioError::js)
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

pub fn set_body_overflow(value: &str) {
    set_style(&body(), "overflow", value);
}

pub fn is_attached(el: &Element) -> bool {
    el.parent_node().is_some()
}

// ── Window geometry ──

pub fn scroll_y() -> f64 {
    window().scroll_y().unwrap_or(0.0)
}

pub fn viewport_width() -> f64 {
    window()
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

pub fn smooth_scroll_to(top: f64) {
    let opts = ScrollToOptions::new();
    opts.set_top(top);
    opts.set_behavior(ScrollBehavior::Smooth);
    window().scroll_to_with_scroll_to_options(&opts);
}

/// Layout offset of an element, when it is an `HtmlElement`.
pub fn offset_box(el: &Element) -> Option<(f64, f64)> {
    el.dyn_ref::<HtmlElement>()
        .map(|h| (f64::from(h.offset_top()), f64::from(h.offset_height())))
}

pub fn hostname() -> String {
    window().location().hostname().unwrap_or_default()
}

/// Log a warning when an expected element is absent.
pub fn required<'a, T>(el: &'a Option<T>, what: &str) -> Option<&'a T> {
    if el.is_none() {
        tracing::warn!("{}", PortfolioError::missing(what));
    }
    el.as_ref()
}

// ── Elements struct ──

/// Elements the controllers work with.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    pub loading_screen: Option<Element>,
    pub navbar: Option<HtmlElement>,
    pub nav_toggle: Option<Element>,
    pub nav_menu: Option<Element>,
    pub nav_links: Vec<Element>,
    pub back_to_top: Option<Element>,
    pub contact_form: Option<HtmlFormElement>,
    pub typing_text: Option<Element>,
}

impl Elements {
    /// Resolve all DOM references. Call once the document is parsed.
    pub fn bind() -> Elements {
        Elements {
            loading_screen: by_id("loading-screen"),
            navbar: by_id_typed::<HtmlElement>("navbar"),
            nav_toggle: by_id("nav-toggle"),
            nav_menu: by_id("nav-menu"),
            nav_links: query_all(".nav-link"),
            back_to_top: by_id("back-to-top"),
            contact_form: by_id_typed::<HtmlFormElement>("contact-form"),
            typing_text: query(".typing-text"),
        }
    }
}
