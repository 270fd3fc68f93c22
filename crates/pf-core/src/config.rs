//! Site configuration.
//!
//! Every timing constant and threshold used by the controllers lives here so a
//! host page can tune them and tests can drive them with a virtual clock.
//! All groups are `#[serde(default)]`: a partial document only overrides the
//! fields it names.

use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timings {
    pub loading_reveal_ms: u32,
    pub loading_remove_ms: u32,
    pub type_ms: u32,
    pub delete_ms: u32,
    pub pause_ms: u32,
    pub stagger_ms: u32,
    pub notify_auto_hide_ms: u32,
    pub notify_exit_ms: u32,
    pub submit_delay_ms: u32,
    pub submit_reset_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            loading_reveal_ms: 2000,
            loading_remove_ms: 500,
            type_ms: 100,
            delete_ms: 50,
            pause_ms: 1000,
            stagger_ms: 100,
            notify_auto_hide_ms: 5000,
            notify_exit_ms: 300,
            submit_delay_ms: 2000,
            submit_reset_ms: 3000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    /// Past this offset the navbar gets the `scrolled` class.
    pub scrolled_px: f64,
    /// Navbar auto-hide only applies to viewports wider than this.
    pub hide_nav_min_width: f64,
    /// Extra lead applied above each section when picking the active one.
    pub section_offset_px: f64,
    pub back_to_top_px: f64,
    /// Scroll offset used when the page has no navbar.
    pub fallback_nav_height: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            scrolled_px: 100.0,
            hide_nav_min_width: 768.0,
            section_offset_px: 100.0,
            back_to_top_px: 500.0,
            fallback_nav_height: 80.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    pub threshold: f64,
    pub bottom_margin_px: u32,
    pub selectors: Vec<String>,
    pub stagger_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin_px: 50,
            selectors: [
                ".hero-content",
                ".hero-image",
                ".section-header",
                ".skill-card",
                ".cert-card",
                ".project-card",
                ".contact-item",
                ".detail-item",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            stagger_class: "stagger-children".into(),
        }
    }
}

impl RevealConfig {
    /// One comma-joined selector covering every watched group.
    pub fn selector(&self) -> String {
        self.selectors.join(",")
    }

    /// Observer root margin: shrink the viewport bottom so elements trigger
    /// only once they are `bottom_margin_px` into view.
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin_px)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypingConfig {
    pub phrases: Vec<String>,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "Data Analyst",
                "Software Engineer",
                "Python Developer",
                "AI/ML Enthusiast",
                "Problem Solver",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Links ending in one of these are real pages and are never intercepted.
    pub page_suffixes: Vec<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            page_suffixes: vec![".html".into()],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactConfig {
    pub validate_fields: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub timings: Timings,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    pub typing: TypingConfig,
    pub navigation: NavigationConfig,
    pub contact: ContactConfig,
    pub dev_hosts: Vec<String>,
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            scroll: ScrollConfig::default(),
            reveal: RevealConfig::default(),
            typing: TypingConfig::default(),
            navigation: NavigationConfig::default(),
            contact: ContactConfig::default(),
            dev_hosts: vec!["localhost".into(), "127.0.0.1".into()],
            log_level: "info".into(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: SiteConfig = serde_json::from_str(text)
            .map_err(|e| PortfolioError::InvalidConfig(e.to_string()))?;
        cfg.validate()
    }

    /// Drop empty phrases and reject values no controller can work with.
    pub fn validate(mut self) -> Result<Self> {
        self.typing.phrases.retain(|p| !p.is_empty());
        if self.typing.phrases.is_empty() {
            return Err(PortfolioError::InvalidConfig(
                "typing.phrases must contain at least one non-empty phrase".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(PortfolioError::InvalidConfig(format!(
                "reveal.threshold {} outside [0, 1]",
                self.reveal.threshold
            )));
        }
        Ok(self)
    }

    /// Diagnostics (error notifications) are only surfaced on these hosts.
    pub fn is_dev_host(&self, hostname: &str) -> bool {
        self.dev_hosts.iter().any(|h| h == hostname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site_constants() {
        let cfg = SiteConfig::default();
        assert_eq!(cfg.timings.loading_reveal_ms, 2000);
        assert_eq!(cfg.timings.notify_auto_hide_ms, 5000);
        assert_eq!(cfg.timings.notify_exit_ms, 300);
        assert_eq!(cfg.typing.phrases.len(), 5);
        assert_eq!(cfg.reveal.selectors.len(), 8);
        assert_eq!(cfg.reveal.root_margin(), "0px 0px -50px 0px");
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let cfg = SiteConfig::from_json(r#"{"timings":{"typeMs":80},"devHosts":["dev.local"]}"#)
            .expect("valid config");
        assert_eq!(cfg.timings.type_ms, 80);
        assert_eq!(cfg.timings.delete_ms, 50);
        assert!(cfg.is_dev_host("dev.local"));
        assert!(!cfg.is_dev_host("localhost"));
    }

    #[test]
    fn rejects_phrase_list_with_only_empty_entries() {
        let err = SiteConfig::from_json(r#"{"typing":{"phrases":["",""]}}"#).unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = SiteConfig::from_json(r#"{"reveal":{"threshold":1.5}}"#).unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            SiteConfig::from_json("{not json"),
            Err(PortfolioError::InvalidConfig(_))
        ));
    }

    #[test]
    fn selector_joins_groups() {
        let reveal = RevealConfig {
            selectors: vec![".a".into(), ".b".into()],
            ..RevealConfig::default()
        };
        assert_eq!(reveal.selector(), ".a,.b");
    }
}
