//! Config discovery.
//!
//! Priority: a `window.portfolioConfig` object → a
//! `<script type="application/json" id="portfolio-config">` block → defaults.

use gloo_utils::window;
use pf_core::{PortfolioError, SiteConfig};
use wasm_bindgen::JsValue;

const GLOBAL_KEY: &str = "portfolioConfig";
const SCRIPT_ID: &str = "portfolio-config";

pub fn load() -> Result<SiteConfig, PortfolioError> {
    let global = js_sys::Reflect::get(&window(), &JsValue::from_str(GLOBAL_KEY))
        .unwrap_or(JsValue::UNDEFINED);
    if !global.is_undefined() && !global.is_null() {
        let cfg: SiteConfig = serde_wasm_bindgen::from_value(global)
            .map_err(|e| PortfolioError::InvalidConfig(format!("window.{GLOBAL_KEY}: {e}")))?;
        return cfg.validate();
    }

    match crate::dom::by_id(SCRIPT_ID) {
        Some(script) => SiteConfig::from_json(&script.text_content().unwrap_or_default()),
        None => Ok(SiteConfig::default()),
    }
}
