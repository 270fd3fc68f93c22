//! Contact form: simulated submission with button feedback, plus optional
//! blur-time field validation.

use pf_core::contact::{
    FieldRules, SimulatedTransport, SubmitFlow, SubmitPhase, SubmitView, Validity, validate_field,
};
use pf_core::{NotificationKind, PortfolioError};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use crate::dom;
use crate::events::Controller;
use crate::notify;
use crate::state::Context;

/// The form and the parts of its submit button that change per phase.
struct FormView {
    form: HtmlFormElement,
    button: HtmlButtonElement,
    label: Element,
    icon: Option<Element>,
    original: String,
}

impl FormView {
    fn find(form: &HtmlFormElement) -> Option<Self> {
        let button = form
            .query_selector("button[type=\"submit\"]")
            .ok()
            .flatten()?
            .dyn_into::<HtmlButtonElement>()
            .ok()?;
        let label = button
            .query_selector(".btn-text")
            .ok()
            .flatten()
            .unwrap_or_else(|| button.clone().into());
        let icon = button.query_selector(".btn-icon").ok().flatten();
        let original = label.text_content().unwrap_or_default();
        Some(Self {
            form: form.clone(),
            button,
            label,
            icon,
            original,
        })
    }
}

impl SubmitView for FormView {
    fn render(&self, phase: SubmitPhase) {
        self.label
            .set_text_content(Some(phase.label(&self.original)));
        if let Some(icon) = &self.icon {
            icon.set_class_name(phase.icon_class());
        }
        self.button.set_disabled(phase.disabled());
    }

    fn reset_form(&self) {
        self.form.reset();
    }

    fn announce(&self, message: &str, kind: NotificationKind) {
        notify::show(message, kind);
    }
}

pub fn init(ctx: &Context) -> Result<Controller, PortfolioError> {
    let mut ctl = Controller::new("contact form");
    let Some(form) = dom::required(&ctx.els.contact_form, "#contact-form") else {
        return Ok(ctl);
    };

    let timings = &ctx.config.timings;
    let flow = FormView::find(form).map(|view| {
        SubmitFlow::new(
            ctx.sched,
            view,
            SimulatedTransport::new(ctx.sched, timings.submit_delay_ms),
            timings.submit_reset_ms,
        )
    });
    if flow.is_none() {
        tracing::warn!("contact form has no submit button");
    }

    let on_submit = flow.clone();
    ctl.handlers.on(form, "submit", move |event| {
        event.prevent_default();
        if let Some(flow) = &on_submit {
            flow.submit();
        }
    })?;
    if let Some(flow) = flow {
        ctl.on_shutdown(move || flow.cancel());
    }

    if ctx.config.contact.validate_fields {
        wire_validation(&mut ctl, form)?;
    }
    Ok(ctl)
}

fn field_value(field: &Element) -> String {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

fn wire_validation(ctl: &mut Controller, form: &HtmlFormElement) -> Result<(), PortfolioError> {
    let fields = dom::query_all_within(form, "input, textarea");
    for field in &fields {
        let rules = FieldRules {
            email: field.get_attribute("type").as_deref() == Some("email"),
            required: field.has_attribute("required"),
        };
        let on_blur = field.clone();
        ctl.handlers.on(field, "blur", move |_| {
            dom::remove_class(&on_blur, Validity::Valid.class());
            dom::remove_class(&on_blur, Validity::Invalid.class());
            if let Some(verdict) = validate_field(rules, &field_value(&on_blur)) {
                dom::add_class(&on_blur, verdict.class());
            }
        })?;
        let on_input = field.clone();
        ctl.handlers.on(field, "input", move |_| {
            dom::remove_class(&on_input, Validity::Invalid.class());
        })?;
    }
    tracing::debug!(fields = fields.len(), "contact field validation enabled");
    Ok(())
}
