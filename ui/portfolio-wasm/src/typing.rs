//! Typewriter headline in `.typing-text`.

use pf_core::PortfolioError;
use pf_core::typing::{self, TypingState};

use crate::dom;
use crate::events::Controller;
use crate::state::Context;

pub fn init(ctx: &Context) -> Result<Controller, PortfolioError> {
    let mut ctl = Controller::new("typing effect");
    let Some(target) = dom::required(&ctx.els.typing_text, ".typing-text") else {
        return Ok(ctl);
    };

    let state = TypingState::new(&ctx.config.typing.phrases, &ctx.config.timings)?;
    let target = target.clone();
    let handle = typing::start(&ctx.sched, state, move |text| {
        target.set_text_content(Some(text));
    });
    ctl.track(handle);
    Ok(ctl)
}
