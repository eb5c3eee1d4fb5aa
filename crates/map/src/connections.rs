//! Route selection and arc rendering state.

use formats::Connection;
use foundation::Rgb;
use foundation::easing::Easing;
use foundation::math::{Projection, Vec2};
use foundation::time::Time;
use runtime::{Step, TransitionSlot, TransitionSpec};

use crate::config::ArcStyle;

/// The top `max_routes` outgoing connections of `country`, busiest first.
/// Equal route counts keep their dataset order.
pub fn select_routes(country: &str, all: &[Connection], max_routes: usize) -> Vec<Connection> {
    let mut routes: Vec<Connection> = all.iter().filter(|c| c.source == country).cloned().collect();
    routes.sort_by(|a, b| b.num_routes.cmp(&a.num_routes));
    routes.truncate(max_routes);
    routes
}

/// Geometry and base color of one arc.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPlan {
    /// Position in the rendered order; drives color and stagger.
    pub index: usize,
    pub connection: Connection,
    pub from: Vec2,
    pub to: Vec2,
    pub radius: f64,
    pub path: String,
    pub color: Rgb,
    pub delay_ms: f64,
}

#[derive(Debug, Clone)]
pub struct ConnectionRenderer {
    style: ArcStyle,
}

impl ConnectionRenderer {
    pub fn new(style: ArcStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ArcStyle {
        &self.style
    }

    /// Gradient color for position `index` of `count`.
    pub fn color_at(&self, index: usize, count: usize) -> Rgb {
        let t = if count > 1 {
            index as f64 / (count - 1) as f64
        } else {
            0.0
        };
        self.style.gradient_start.lerp(self.style.gradient_end, t)
    }

    /// Lays out arcs for already selected routes. Routes whose endpoints do
    /// not project are skipped without shifting the others' colors.
    pub fn plan<P: Projection>(&self, routes: &[Connection], projection: &P) -> Vec<ArcPlan> {
        let count = routes.len();
        routes
            .iter()
            .enumerate()
            .filter_map(|(index, conn)| {
                let from = projection.project(conn.source_coords);
                let to = projection.project(conn.dest_coords);
                if !from.is_finite() || !to.is_finite() {
                    return None;
                }
                let radius = from.distance(to) * self.style.radius_factor;
                Some(ArcPlan {
                    index,
                    connection: conn.clone(),
                    from,
                    to,
                    radius,
                    path: arc_path(from, to, radius),
                    color: self.color_at(index, count),
                    delay_ms: index as f64 * self.style.stagger_ms,
                })
            })
            .collect()
    }
}

/// Clockwise elliptical arc from `from` to `to`.
pub fn arc_path(from: Vec2, to: Vec2, radius: f64) -> String {
    format!(
        "M{:.2},{:.2} A{:.2},{:.2} 0 0,1 {:.2},{:.2}",
        from.x, from.y, radius, radius, to.x, to.y
    )
}

/// Resolved stroke of one arc.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcVisual {
    pub index: usize,
    pub opacity: f64,
    pub width: f64,
    pub color: Rgb,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reveal {
    /// Fade each arc in after its stagger delay.
    Staggered,
    /// Show at rest opacity right away.
    Immediate,
}

#[derive(Debug)]
struct ArcState {
    plan: ArcPlan,
    opacity: f64,
    fade: TransitionSlot<f64>,
    hovered: bool,
    selected: bool,
}

/// Live arcs on the map. Hover and selection are independent flags; the
/// selected style wins over hover, hover over the fade.
#[derive(Debug)]
pub struct ArcLayer {
    style: ArcStyle,
    arcs: Vec<ArcState>,
}

impl ArcLayer {
    pub fn new(style: ArcStyle) -> Self {
        Self {
            style,
            arcs: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.arcs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn plans(&self) -> impl Iterator<Item = &ArcPlan> + '_ {
        self.arcs.iter().map(|a| &a.plan)
    }

    /// Replaces the layer's arcs and returns their initial strokes.
    pub fn show(&mut self, now: Time, plans: Vec<ArcPlan>, reveal: Reveal) -> Vec<ArcVisual> {
        let fade = TransitionSpec::millis(self.style.fade_ms, Easing::CubicInOut);
        self.arcs = plans
            .into_iter()
            .map(|plan| {
                let mut state = ArcState {
                    opacity: 0.0,
                    fade: TransitionSlot::new(),
                    hovered: false,
                    selected: false,
                    plan,
                };
                match reveal {
                    Reveal::Staggered => {
                        let spec = fade.with_delay_ms(state.plan.delay_ms);
                        state.fade.start_between(now, spec, 0.0, self.style.rest_opacity);
                    }
                    Reveal::Immediate => state.opacity = self.style.rest_opacity,
                }
                state
            })
            .collect();
        (0..self.arcs.len()).map(|i| self.visual_of(i)).collect()
    }

    fn position(&self, index: usize) -> Option<usize> {
        self.arcs.iter().position(|a| a.plan.index == index)
    }

    pub fn find(&self, connection: &Connection) -> Option<usize> {
        self.arcs
            .iter()
            .find(|a| a.plan.connection.same_route(connection))
            .map(|a| a.plan.index)
    }

    pub fn plan(&self, index: usize) -> Option<&ArcPlan> {
        self.position(index).map(|i| &self.arcs[i].plan)
    }

    pub fn visual(&self, index: usize) -> Option<ArcVisual> {
        self.position(index).map(|i| self.visual_of(i))
    }

    fn visual_of(&self, pos: usize) -> ArcVisual {
        let arc = &self.arcs[pos];
        let s = &self.style;
        let (opacity, width, color) = if arc.selected {
            (s.selected_opacity, s.selected_width, s.selected_color)
        } else if arc.hovered {
            (s.hover_opacity, s.hover_width, arc.plan.color)
        } else {
            (arc.opacity, s.rest_width, arc.plan.color)
        };
        ArcVisual {
            index: arc.plan.index,
            opacity,
            width,
            color,
        }
    }

    /// Sets the hover flag. Returns the new stroke, or `None` for an unknown
    /// arc.
    pub fn set_hovered(&mut self, index: usize, hovered: bool) -> Option<ArcVisual> {
        let pos = self.position(index)?;
        self.arcs[pos].hovered = hovered;
        Some(self.visual_of(pos))
    }

    /// Marks exactly the arcs matching `connection` as selected. Every arc
    /// returns to rest opacity, as a finished fade would leave it.
    pub fn select(&mut self, connection: Option<&Connection>) -> Vec<ArcVisual> {
        let rest = self.style.rest_opacity;
        for arc in &mut self.arcs {
            arc.selected = connection.is_some_and(|c| arc.plan.connection.same_route(c));
            arc.fade.cancel();
            arc.opacity = rest;
        }
        (0..self.arcs.len()).map(|i| self.visual_of(i)).collect()
    }

    /// Advances fades; returns strokes that changed.
    pub fn tick(&mut self, now: Time) -> Vec<ArcVisual> {
        let mut changed = Vec::new();
        for pos in 0..self.arcs.len() {
            let step = self.arcs[pos].fade.tick(now);
            if let Some(Step::Running(v) | Step::Finished(v)) = step {
                self.arcs[pos].opacity = v;
                changed.push(self.visual_of(pos));
            }
        }
        changed
    }

    pub fn is_animating(&self) -> bool {
        self.arcs.iter().any(|a| a.fade.is_active())
    }
}
