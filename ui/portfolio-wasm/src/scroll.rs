//! Scroll effects: navbar styling / auto-hide and active-section highlighting,
//! coalesced to one update per animation frame.

use std::cell::Cell;
use std::rc::Rc;

use gloo_utils::window;
use pf_core::nav::{
    FrameGate, NavbarScroll, SectionBounds, active_section, link_targets, nav_height,
};
use pf_core::{PortfolioError, Scheduler, SiteConfig};
use web_sys::HtmlElement;

use crate::dom;
use crate::events::Controller;
use crate::state::Context;

pub fn init(ctx: &Context) -> Result<Controller, PortfolioError> {
    let mut ctl = Controller::new("scroll effects");
    let Some(navbar) = dom::required(&ctx.els.navbar, "#navbar") else {
        return Ok(ctl);
    };

    let gate = Rc::new(Cell::new(FrameGate::default()));
    let tracker = Rc::new(Cell::new(NavbarScroll::new(dom::scroll_y())));
    let navbar = navbar.clone();
    let cfg = ctx.config.clone();
    let sched = ctx.sched;
    let life = ctl.life();

    ctl.handlers.on_passive(&window(), "scroll", move |_| {
        let mut g = gate.get();
        let first = g.request();
        gate.set(g);
        if !first {
            return;
        }

        let gate = gate.clone();
        let tracker = tracker.clone();
        let navbar = navbar.clone();
        let cfg = cfg.clone();
        sched.next_frame(life.guard(Box::new(move || {
            let mut g = gate.get();
            g.complete();
            gate.set(g);
            update_navbar(&navbar, &tracker, &cfg);
            update_active_section(&navbar, &cfg);
        })));
    })?;
    Ok(ctl)
}

fn update_navbar(navbar: &HtmlElement, tracker: &Cell<NavbarScroll>, cfg: &SiteConfig) {
    let mut state = tracker.get();
    let frame = state.update(dom::scroll_y(), dom::viewport_width(), &cfg.scroll);
    tracker.set(state);

    dom::toggle_class(navbar, "scrolled", frame.scrolled);
    if let Some(visibility) = frame.visibility {
        dom::set_style(navbar, "transform", visibility.transform());
    }
}

fn update_active_section(navbar: &HtmlElement, cfg: &SiteConfig) {
    let sections: Vec<SectionBounds> = dom::query_all("section[id]")
        .iter()
        .filter_map(|s| {
            let (top, height) = dom::offset_box(s)?;
            Some(SectionBounds {
                id: s.id(),
                top,
                height,
            })
        })
        .collect();

    let current = active_section(
        dom::scroll_y(),
        nav_height(Some(f64::from(navbar.offset_height())), &cfg.scroll),
        cfg.scroll.section_offset_px,
        &sections,
    );

    for link in dom::query_all(".nav-link") {
        let active = link_targets(link.get_attribute("href").as_deref(), current);
        dom::toggle_class(&link, "active", active);
    }
}
