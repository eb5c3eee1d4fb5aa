//! Pointer geometry for drag-pan and wheel-zoom on the map's SVG.

use foundation::math::Vec2;

/// Pointer travel, in client pixels, under which a press still counts as a
/// click.
const CLICK_SLOP: f64 = 3.0;

/// How a `preserveAspectRatio="xMidYMid meet"` viewBox sits in its client
/// rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewBoxFit {
    scale: f64,
    offset: Vec2,
}

impl ViewBoxFit {
    /// `None` while the element has no area.
    pub fn new(origin: Vec2, size: Vec2, viewport: Vec2) -> Option<Self> {
        let scale = (size.x / viewport.x).min(size.y / viewport.y);
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let offset = Vec2::new(
            origin.x + (size.x - viewport.x * scale) / 2.0,
            origin.y + (size.y - viewport.y * scale) / 2.0,
        );
        Some(Self { scale, offset })
    }

    pub fn to_viewbox(&self, client: Vec2) -> Vec2 {
        Vec2::new(
            (client.x - self.offset.x) / self.scale,
            (client.y - self.offset.y) / self.scale,
        )
    }

    pub fn delta_to_viewbox(&self, delta: Vec2) -> Vec2 {
        Vec2::new(delta.x / self.scale, delta.y / self.scale)
    }
}

/// Scale factor for one wheel event, as d3-zoom computes it. `delta_mode` is
/// the DOM's pixel (0), line (1) or page (2) unit.
pub fn wheel_factor(delta_y: f64, delta_mode: u32) -> f64 {
    let unit = match delta_mode {
        0 => 0.002,
        1 => 0.05,
        _ => 1.0,
    };
    2f64.powf(-delta_y * unit)
}

/// One press-move-release sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    fit: ViewBoxFit,
    last: Vec2,
    travelled: f64,
}

impl Drag {
    pub fn start(fit: ViewBoxFit, at: Vec2) -> Self {
        Self {
            fit,
            last: at,
            travelled: 0.0,
        }
    }

    /// Pan delta in viewBox units for a pointer move to `to`.
    pub fn move_to(&mut self, to: Vec2) -> Vec2 {
        let delta = Vec2::new(to.x - self.last.x, to.y - self.last.y);
        self.travelled += self.last.distance(to);
        self.last = to;
        self.fit.delta_to_viewbox(delta)
    }

    pub fn is_click(&self) -> bool {
        self.travelled <= CLICK_SLOP
    }
}
