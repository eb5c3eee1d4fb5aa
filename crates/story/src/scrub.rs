//! Scrubbed effects: values tied directly to the scroll offset.
//!
//! Each effect maps a pair of trigger points (element edge against viewport
//! line) to a progress in `[0, 1]` and interpolates linearly.

use runtime::{ScrollAnchor, ScrollPosition, scrub_progress};

pub const CLOUD_DRIFT: [f64; 2] = [-50.0, -30.0];
pub const HERO_CONTENT_RISE: f64 = -30.0;
pub const HERO_WINDOW_SCALE: f64 = 0.9;
pub const HERO_WINDOW_OPACITY: f64 = 0.5;
pub const SCROLL_INDICATOR_SPAN: f64 = 200.0;
pub const SECTION_PARALLAX: f64 = -20.0;

/// Reading progress bar width in percent.
pub fn progress_width(position: ScrollPosition, document_height: f64) -> f64 {
    position.page_progress(document_height) * 100.0
}

/// Hero effects for one scroll position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeroFrame {
    /// Vertical offsets of the two cloud layers.
    pub clouds: [f64; 2],
    pub content_opacity: f64,
    pub content_y: f64,
    pub indicator_opacity: f64,
    pub window_scale: f64,
    pub window_opacity: f64,
}

impl HeroFrame {
    pub fn at(hero: ScrollAnchor, position: ScrollPosition) -> Self {
        let vh = position.viewport_height;
        let y = position.scroll_y;
        // top/top to bottom/top
        let leave = scrub_progress(hero.scroll_at(0.0, 0.0, vh), hero.scroll_at(1.0, 0.0, vh), y);
        // center/center to bottom/top
        let exit = scrub_progress(hero.scroll_at(0.5, 0.5, vh), hero.scroll_at(1.0, 0.0, vh), y);
        let indicator = scrub_progress(hero.top, hero.top + SCROLL_INDICATOR_SPAN, y);
        Self {
            clouds: CLOUD_DRIFT.map(|d| d * leave),
            content_opacity: 1.0 - exit,
            content_y: HERO_CONTENT_RISE * exit,
            indicator_opacity: 1.0 - indicator,
            window_scale: 1.0 + (HERO_WINDOW_SCALE - 1.0) * exit,
            window_opacity: 1.0 + (HERO_WINDOW_OPACITY - 1.0) * exit,
        }
    }
}

/// Vertical offset of a section's card while the section crosses the viewport.
pub fn section_offset(section: ScrollAnchor, position: ScrollPosition) -> f64 {
    let vh = position.viewport_height;
    // top/bottom to bottom/top
    let t = scrub_progress(
        section.scroll_at(0.0, 1.0, vh),
        section.scroll_at(1.0, 0.0, vh),
        position.scroll_y,
    );
    SECTION_PARALLAX * t
}
