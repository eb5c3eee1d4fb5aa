//! Scroll geometry shared by scene triggers and presentation effects.
//!
//! Positions are document coordinates in CSS pixels, growing downwards.

/// Vertical extent of an element in the document.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollAnchor {
    pub top: f64,
    pub height: f64,
}

impl ScrollAnchor {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Document y of the point `fraction` of the way down the element.
    pub fn point(&self, fraction: f64) -> f64 {
        self.top + self.height * fraction
    }

    /// Scroll offset at which the element point `element_fraction` lines up
    /// with the viewport line `viewport_fraction`.
    ///
    /// `("top", "85%")` is `scroll_at(0.0, 0.85, vh)`.
    pub fn scroll_at(&self, element_fraction: f64, viewport_fraction: f64, viewport_height: f64) -> f64 {
        self.point(element_fraction) - viewport_fraction * viewport_height
    }
}

/// Current scroll offset and viewport size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollPosition {
    pub scroll_y: f64,
    pub viewport_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_y: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height: viewport_height.max(0.0),
        }
    }

    /// Document y of the viewport line `fraction` of the way down the viewport.
    pub fn line(&self, fraction: f64) -> f64 {
        self.scroll_y + self.viewport_height * fraction
    }

    /// Whole-page progress in `[0, 1]`.
    pub fn page_progress(&self, document_height: f64) -> f64 {
        let scrollable = document_height - self.viewport_height;
        if scrollable <= 0.0 {
            return 1.0;
        }
        (self.scroll_y / scrollable).clamp(0.0, 1.0)
    }
}

/// Linear progress of `scroll_y` between two scroll offsets, clamped.
pub fn scrub_progress(start_scroll: f64, end_scroll: f64, scroll_y: f64) -> f64 {
    let span = end_scroll - start_scroll;
    if span <= 0.0 {
        return if scroll_y >= end_scroll { 1.0 } else { 0.0 };
    }
    ((scroll_y - start_scroll) / span).clamp(0.0, 1.0)
}
