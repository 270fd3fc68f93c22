//! "Back to top" button: visible past a scroll threshold, scrolls home on click.

use gloo_utils::window;
use pf_core::PortfolioError;
use pf_core::nav::back_to_top_visible;

use crate::dom;
use crate::events::Controller;
use crate::state::Context;

pub fn init(ctx: &Context) -> Result<Controller, PortfolioError> {
    let mut ctl = Controller::new("back to top");
    let Some(button) = dom::required(&ctx.els.back_to_top, "#back-to-top") else {
        return Ok(ctl);
    };

    let cfg = ctx.config.clone();
    let on_scroll = button.clone();
    ctl.handlers
        .on_passive(&window(), "scroll", move |_| {
            let visible = back_to_top_visible(dom::scroll_y(), &cfg.scroll);
            dom::toggle_class(&on_scroll, "visible", visible);
        })?
        .on(button, "click", |_| dom::smooth_scroll_to(0.0))?;
    Ok(ctl)
}
