//! Navigation policy and scroll-position math.
//!
//! Pure decisions only; `portfolio-wasm` reads positions from the DOM, asks
//! these functions what to do and applies the answer.

use crate::config::{NavigationConfig, ScrollConfig};

/// What a click on a nav link should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkAction {
    /// New-tab links and page files: leave the browser alone entirely.
    Native,
    /// In-page anchor: prevent default, scroll to the section, mark the link
    /// active and close the mobile menu. `id` has the leading `#` stripped.
    Anchor { id: String },
    /// Anything else navigates normally but still closes the mobile menu.
    Passthrough,
}

impl LinkAction {
    pub fn classify(href: Option<&str>, target: Option<&str>, cfg: &NavigationConfig) -> Self {
        let href = href.unwrap_or_default();
        if target == Some("_blank") || cfg.page_suffixes.iter().any(|s| href.ends_with(s.as_str())) {
            return Self::Native;
        }
        match href.strip_prefix('#') {
            Some(id) => Self::Anchor { id: id.to_string() },
            None => Self::Passthrough,
        }
    }

    pub fn closes_menu(&self) -> bool {
        !matches!(self, Self::Native)
    }
}

/// Scroll position that puts a section's top just below the fixed navbar.
pub fn anchor_scroll_top(section_top: f64, nav_height: f64) -> f64 {
    section_top - nav_height
}

/// Navbar height for scroll offsets: the measured height whenever a navbar
/// exists (even a collapsed one), the configured fallback otherwise.
pub fn nav_height(measured: Option<f64>, cfg: &ScrollConfig) -> f64 {
    measured.unwrap_or(cfg.fallback_nav_height)
}

/// Mobile menu: open ⇔ body scroll locked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Value for `document.body.style.overflow`.
    pub fn body_overflow(self) -> &'static str {
        if self.open { "hidden" } else { "" }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// First section whose window `[top - nav_height - lead, top + height)`
/// contains `scroll_y`.
pub fn active_section<'a>(
    scroll_y: f64,
    nav_height: f64,
    lead: f64,
    sections: &'a [SectionBounds],
) -> Option<&'a str> {
    sections
        .iter()
        .find(|s| {
            let start = s.top - nav_height - lead;
            scroll_y >= start && scroll_y < s.top + s.height
        })
        .map(|s| s.id.as_str())
}

/// Whether a nav link's href points at `section`.
pub fn link_targets(href: Option<&str>, section: Option<&str>) -> bool {
    match (href.and_then(|h| h.strip_prefix('#')), section) {
        (Some(h), Some(s)) => h == s,
        _ => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavbarVisibility {
    Shown,
    Hidden,
}

impl NavbarVisibility {
    /// Inline `transform` value.
    pub fn transform(self) -> &'static str {
        match self {
            Self::Shown => "translateY(0)",
            Self::Hidden => "translateY(-100%)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavbarFrame {
    pub scrolled: bool,
    /// `None` on narrow viewports, where the navbar is left where it is.
    pub visibility: Option<NavbarVisibility>,
}

/// Remembers the previous scroll position to tell scrolling down from up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavbarScroll {
    last_y: f64,
}

impl NavbarScroll {
    pub fn new(initial_y: f64) -> Self {
        Self { last_y: initial_y }
    }

    pub fn update(&mut self, y: f64, viewport_width: f64, cfg: &ScrollConfig) -> NavbarFrame {
        let scrolled = y > cfg.scrolled_px;
        let visibility = (viewport_width > cfg.hide_nav_min_width).then(|| {
            if y > self.last_y && y > cfg.scrolled_px {
                NavbarVisibility::Hidden
            } else {
                NavbarVisibility::Shown
            }
        });
        self.last_y = y;
        NavbarFrame { scrolled, visibility }
    }
}

/// Animation-frame gate: at most one pending frame per burst of scroll events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// True when the caller must request a frame; false if one is queued.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Call at the start of the frame callback.
    pub fn complete(&mut self) {
        self.pending = false;
    }
}

pub fn back_to_top_visible(scroll_y: f64, cfg: &ScrollConfig) -> bool {
    scroll_y > cfg.back_to_top_px
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav() -> NavigationConfig {
        NavigationConfig::default()
    }

    #[test]
    fn new_tab_and_page_links_are_left_to_the_browser() {
        assert_eq!(LinkAction::classify(Some("#about"), Some("_blank"), &nav()), LinkAction::Native);
        assert_eq!(LinkAction::classify(Some("resume.html"), None, &nav()), LinkAction::Native);
        assert!(!LinkAction::Native.closes_menu());
    }

    #[test]
    fn hash_links_are_anchors() {
        let action = LinkAction::classify(Some("#about"), None, &nav());
        assert_eq!(action, LinkAction::Anchor { id: "about".into() });
        assert!(action.closes_menu());
        assert_eq!(
            LinkAction::classify(Some("#"), Some("_self"), &nav()),
            LinkAction::Anchor { id: String::new() }
        );
    }

    #[test]
    fn other_links_pass_through() {
        let action = LinkAction::classify(Some("https://github.com"), None, &nav());
        assert_eq!(action, LinkAction::Passthrough);
        assert!(action.closes_menu());
        assert_eq!(LinkAction::classify(None, None, &nav()), LinkAction::Passthrough);
    }

    #[test]
    fn anchor_scroll_clears_navbar_exactly() {
        assert_eq!(anchor_scroll_top(640.0, 80.0), 560.0);
    }

    #[test]
    fn measured_navbar_height_is_used_even_when_zero() {
        let cfg = ScrollConfig::default();
        assert_eq!(nav_height(Some(64.0), &cfg), 64.0);
        assert_eq!(nav_height(Some(0.0), &cfg), 0.0);
        assert_eq!(nav_height(None, &cfg), 80.0);
    }

    #[test]
    fn menu_toggle_locks_body_scroll() {
        let mut menu = MenuState::default();
        assert!(menu.toggle());
        assert_eq!(menu.body_overflow(), "hidden");
        menu.close();
        assert!(!menu.is_open());
        assert_eq!(menu.body_overflow(), "");
    }

    #[test]
    fn active_section_scenario() {
        let sections = [SectionBounds {
            id: "projects".into(),
            top: 100.0,
            height: 700.0,
        }];
        assert_eq!(active_section(150.0, 80.0, 100.0, &sections), Some("projects"));
        assert!(link_targets(Some("#projects"), Some("projects")));
        assert!(!link_targets(Some("#about"), Some("projects")));
        assert!(!link_targets(Some("#about"), None));
    }

    #[test]
    fn active_section_picks_first_match_and_none_outside() {
        let sections = [
            SectionBounds { id: "home".into(), top: 0.0, height: 600.0 },
            SectionBounds { id: "about".into(), top: 600.0, height: 600.0 },
        ];
        // 500 is inside home and inside about's lead-in window.
        assert_eq!(active_section(500.0, 80.0, 100.0, &sections), Some("home"));
        assert_eq!(active_section(700.0, 80.0, 100.0, &sections), Some("about"));
        assert_eq!(active_section(1300.0, 80.0, 100.0, &sections), None);
    }

    #[test]
    fn navbar_hides_on_scroll_down_and_shows_on_scroll_up() {
        let cfg = ScrollConfig::default();
        let mut nav = NavbarScroll::new(0.0);

        let f = nav.update(50.0, 1024.0, &cfg);
        assert!(!f.scrolled);
        assert_eq!(f.visibility, Some(NavbarVisibility::Shown));

        let f = nav.update(300.0, 1024.0, &cfg);
        assert!(f.scrolled);
        assert_eq!(f.visibility, Some(NavbarVisibility::Hidden));

        let f = nav.update(250.0, 1024.0, &cfg);
        assert_eq!(f.visibility, Some(NavbarVisibility::Shown));
        assert_eq!(NavbarVisibility::Hidden.transform(), "translateY(-100%)");
    }

    #[test]
    fn narrow_viewport_never_moves_navbar() {
        let cfg = ScrollConfig::default();
        let mut nav = NavbarScroll::new(0.0);
        let f = nav.update(400.0, 768.0, &cfg);
        assert!(f.scrolled);
        assert_eq!(f.visibility, None);
    }

    #[test]
    fn frame_gate_coalesces_bursts() {
        let mut gate = FrameGate::default();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());
        gate.complete();
        assert!(gate.request());
    }

    #[test]
    fn back_to_top_threshold() {
        let cfg = ScrollConfig::default();
        assert!(!back_to_top_visible(500.0, &cfg));
        assert!(back_to_top_visible(501.0, &cfg));
    }
}
