//! Navigation: mobile menu toggle and nav-link click policy.
//!
//! Links opening a new tab or pointing at another page are left entirely to
//! the browser. `#section` links smooth-scroll so the section starts just
//! below the fixed navbar.

use std::cell::Cell;
use std::rc::Rc;

use pf_core::PortfolioError;
use pf_core::config::ScrollConfig;
use pf_core::nav::{LinkAction, MenuState, anchor_scroll_top, nav_height};
use web_sys::{Element, HtmlElement};

use crate::dom;
use crate::events::Controller;
use crate::state::Context;

#[derive(Clone)]
struct Menu {
    state: Rc<Cell<MenuState>>,
    toggle: Option<Element>,
    menu: Option<Element>,
}

impl Menu {
    fn apply(&self) {
        let state = self.state.get();
        for el in self.toggle.iter().chain(self.menu.iter()) {
            dom::toggle_class(el, "active", state.is_open());
        }
        dom::set_body_overflow(state.body_overflow());
    }

    fn flip(&self) {
        let mut state = self.state.get();
        state.toggle();
        self.state.set(state);
        self.apply();
    }

    fn close(&self) {
        if self.toggle.is_none() || self.menu.is_none() {
            return;
        }
        let mut state = self.state.get();
        state.close();
        self.state.set(state);
        self.apply();
    }
}

pub fn init(ctx: &Context) -> Result<Controller, PortfolioError> {
    let mut ctl = Controller::new("navigation");
    let els = &ctx.els;
    let menu = Menu {
        state: Rc::new(Cell::new(MenuState::default())),
        toggle: els.nav_toggle.clone(),
        menu: els.nav_menu.clone(),
    };

    match (&els.nav_toggle, &els.nav_menu) {
        (Some(toggle), Some(_)) => {
            let menu = menu.clone();
            ctl.handlers.on(toggle, "click", move |_| menu.flip())?;
        }
        _ => tracing::warn!("#nav-toggle / #nav-menu element not found"),
    }

    for link in &els.nav_links {
        let link_el = link.clone();
        let links = els.nav_links.clone();
        let navbar = els.navbar.clone();
        let cfg = ctx.config.clone();
        let menu = menu.clone();
        ctl.handlers.on(link, "click", move |event| {
            let action = LinkAction::classify(
                link_el.get_attribute("href").as_deref(),
                link_el.get_attribute("target").as_deref(),
                &cfg.navigation,
            );
            if let LinkAction::Anchor { id } = &action {
                event.prevent_default();
                scroll_to_section(id, navbar.as_ref(), &cfg.scroll);
                for other in &links {
                    dom::remove_class(other, "active");
                }
                dom::add_class(&link_el, "active");
            }
            if action.closes_menu() {
                menu.close();
            }
        })?;
    }
    Ok(ctl)
}

fn scroll_to_section(id: &str, navbar: Option<&HtmlElement>, cfg: &ScrollConfig) {
    if id.is_empty() {
        return;
    }
    let Some((top, _)) = dom::by_id(id).and_then(|s| dom::offset_box(&s)) else {
        return;
    };
    let measured = navbar.map(|n| f64::from(n.offset_height()));
    dom::smooth_scroll_to(anchor_scroll_top(top, nav_height(measured, cfg)));
}
