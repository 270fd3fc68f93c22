//! Splash screen: fade out after a delay, then drop it from the document.

use pf_core::PortfolioError;
use pf_core::loading::{self, Splash};
use web_sys::Element;

use crate::dom;
use crate::events::Controller;
use crate::state::Context;

struct SplashScreen(Element);

impl Splash for SplashScreen {
    fn hide(&self) {
        dom::add_class(&self.0, "hidden");
    }

    fn is_attached(&self) -> bool {
        dom::is_attached(&self.0)
    }

    fn remove(&self) {
        self.0.remove();
    }
}

pub fn init(ctx: &Context) -> Result<Controller, PortfolioError> {
    let mut ctl = Controller::new("loading screen");
    let Some(screen) = dom::required(&ctx.els.loading_screen, "#loading-screen") else {
        return Ok(ctl);
    };

    let timings = &ctx.config.timings;
    let handle = loading::dismiss_after(
        &ctx.sched,
        SplashScreen(screen.clone()),
        timings.loading_reveal_ms,
        timings.loading_remove_ms,
    );
    ctl.track(handle);
    Ok(ctl)
}
