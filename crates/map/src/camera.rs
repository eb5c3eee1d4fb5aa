//! Pan/zoom camera over the map's root group.

use foundation::math::Vec2;
use foundation::time::Time;
use runtime::{Started, Step, TransitionSlot, TransitionSpec};

use crate::config::MapConfig;

/// Screen transform `p -> p * k + (x, y)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CameraTransform {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// The transform that draws map point `focus` at screen point `at`
    /// with scale `k`.
    pub fn centered_on(focus: Vec2, at: Vec2, k: f64) -> Self {
        Self::new(at.x - focus.x * k, at.y - focus.y * k, k)
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    pub fn invert(&self, p: Vec2) -> Vec2 {
        Vec2::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

/// Tween between two transforms.
///
/// The map point under the viewport center moves linearly while the scale
/// moves geometrically, so zooming feels uniform and the scale never leaves
/// the range spanned by the endpoints.
fn interpolator(from: CameraTransform, to: CameraTransform, center: Vec2) -> impl Fn(f64) -> CameraTransform {
    let c0 = from.invert(center);
    let c1 = to.invert(center);
    let (lo, hi) = if from.k <= to.k { (from.k, to.k) } else { (to.k, from.k) };
    move |t| {
        if t >= 1.0 {
            return to;
        }
        if t <= 0.0 {
            return from;
        }
        let k = (from.k.ln() + (to.k.ln() - from.k.ln()) * t).exp().clamp(lo, hi);
        CameraTransform::centered_on(c0.lerp(c1, t), center, k)
    }
}

#[derive(Debug)]
pub struct CameraController {
    center: Vec2,
    scale_extent: [f64; 2],
    fly: TransitionSpec,
    zoom_step: TransitionSpec,
    current: CameraTransform,
    target: CameraTransform,
    slot: TransitionSlot<CameraTransform>,
}

impl CameraController {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            center: Vec2::new(config.viewport.width / 2.0, config.viewport.height / 2.0),
            scale_extent: config.scale_extent,
            fly: TransitionSpec::millis(config.fly_duration_ms, config.fly_easing),
            zoom_step: TransitionSpec::millis(config.zoom_step_duration_ms, config.fly_easing),
            current: CameraTransform::IDENTITY,
            target: CameraTransform::IDENTITY,
            slot: TransitionSlot::new(),
        }
    }

    pub fn current(&self) -> CameraTransform {
        self.current
    }

    /// Where the last request is heading.
    pub fn target(&self) -> CameraTransform {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.slot.is_active()
    }

    fn clamp(&self, k: f64) -> f64 {
        let [min, max] = self.scale_extent;
        if k.is_nan() { min } else { k.clamp(min, max) }
    }

    /// Animate so that screen-space map point `focus` ends at the viewport
    /// center at scale `k` (clamped to the extent).
    pub fn fly_to(&mut self, now: Time, focus: Vec2, k: f64) -> Started {
        let target = CameraTransform::centered_on(focus, self.center, self.clamp(k));
        self.animate(now, target, self.fly)
    }

    /// Animate back to the identity transform.
    pub fn reset(&mut self, now: Time) -> Started {
        let k = self.clamp(1.0);
        let target = CameraTransform::centered_on(self.center, self.center, k);
        self.animate(now, target, self.fly)
    }

    /// Multiply the current scale by `factor` about the viewport center.
    pub fn zoom_by(&mut self, now: Time, factor: f64) -> Started {
        self.settle(now);
        let focus = self.current.invert(self.center);
        let target = CameraTransform::centered_on(focus, self.center, self.clamp(self.current.k * factor));
        self.animate(now, target, self.zoom_step)
    }

    /// Shift by a screen-space `delta` right away, from wherever a running
    /// move has got to.
    pub fn pan_by(&mut self, now: Time, delta: Vec2) {
        self.settle(now);
        let current = self.current;
        self.snap_to(CameraTransform::new(current.x + delta.x, current.y + delta.y, current.k));
    }

    /// Multiply the scale by `factor` right away, keeping the map point under
    /// screen point `at` fixed.
    pub fn zoom_at(&mut self, now: Time, at: Vec2, factor: f64) {
        self.settle(now);
        let focus = self.current.invert(at);
        let k = self.clamp(self.current.k * factor);
        self.snap_to(CameraTransform::centered_on(focus, at, k));
    }

    /// Jump without animating, cancelling any running move.
    pub fn snap_to(&mut self, transform: CameraTransform) {
        self.slot.cancel();
        let transform = CameraTransform {
            k: self.clamp(transform.k),
            ..transform
        };
        self.current = transform;
        self.target = transform;
    }

    fn settle(&mut self, now: Time) {
        if let Some(Step::Running(v) | Step::Finished(v)) = self.slot.sample(now) {
            self.current = v;
        }
    }

    fn animate(&mut self, now: Time, target: CameraTransform, spec: TransitionSpec) -> Started {
        // Start from wherever an interrupted move left the camera.
        self.settle(now);
        let started = self
            .slot
            .start(now, spec, interpolator(self.current, target, self.center));
        if let Some(token) = started.superseded {
            tracing::debug!(?token, "camera move superseded");
        }
        self.target = target;
        started
    }

    /// Advances the running move. Returns the new transform when it changed.
    pub fn tick(&mut self, now: Time) -> Option<CameraTransform> {
        match self.slot.tick(now)? {
            Step::Waiting => None,
            Step::Running(v) | Step::Finished(v) => {
                self.current = v;
                Some(v)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraController, CameraTransform};
    use crate::config::MapConfig;
    use foundation::math::Vec2;
    use foundation::time::Time;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fly_to_centers_focus_at_target_scale() {
        let mut camera = CameraController::new(&MapConfig::default());
        camera.fly_to(Time(0.0), Vec2::new(300.0, 200.0), 3.0);
        assert_eq!(camera.tick(Time(0.9)).map(|t| t.k > 1.0 && t.k < 3.0), Some(true));
        let end = camera.tick(Time(2.0)).expect("finished");
        assert_eq!(end, CameraTransform::new(700.0 - 900.0, 350.0 - 600.0, 3.0));
        assert_eq!(end.apply(Vec2::new(300.0, 200.0)), Vec2::new(700.0, 350.0));
        assert!(!camera.is_animating());
    }

    #[test]
    fn new_request_supersedes_and_starts_mid_flight() {
        let mut camera = CameraController::new(&MapConfig::default());
        let first = camera.fly_to(Time(0.0), Vec2::new(300.0, 200.0), 3.0);
        let mid = camera.tick(Time(0.9)).expect("running");

        let second = camera.reset(Time(0.9));
        assert_eq!(second.superseded, Some(first.token));
        // No jump at the hand-over.
        let resumed = camera.tick(Time(0.9)).expect("running");
        assert!(close(resumed.k, mid.k) && close(resumed.x, mid.x) && close(resumed.y, mid.y));

        assert_eq!(camera.tick(Time(5.0)), Some(CameraTransform::IDENTITY));
    }

    #[test]
    fn scale_stays_in_extent_under_any_sequence() {
        let config = MapConfig::default();
        let mut camera = CameraController::new(&config);
        let mut now = 0.0;
        let mut step = |camera: &mut CameraController, op: usize| {
            match op % 4 {
                0 => camera.zoom_by(Time(now), 1.5),
                1 => camera.zoom_by(Time(now), 0.67),
                2 => camera.fly_to(Time(now), Vec2::new(900.0, 100.0), 50.0),
                _ => camera.reset(Time(now)),
            };
            for _ in 0..4 {
                now += 0.1;
                if let Some(t) = camera.tick(Time(now)) {
                    assert!(t.k >= 1.0 && t.k <= 8.0, "scale {} out of range", t.k);
                }
            }
        };
        for op in [0, 0, 0, 0, 0, 0, 2, 0, 1, 1, 1, 1, 1, 1, 1, 3, 2, 1, 0] {
            step(&mut camera, op);
        }
        now += 5.0;
        camera.tick(Time(now));
        let k = camera.current().k;
        assert!((1.0..=8.0).contains(&k));
    }

    #[test]
    fn zoom_steps_compose_from_current_scale() {
        let mut camera = CameraController::new(&MapConfig::default());
        camera.zoom_by(Time(0.0), 1.5);
        camera.tick(Time(1.0));
        assert!(close(camera.current().k, 1.5));
        camera.zoom_by(Time(1.0), 1.5);
        camera.tick(Time(2.0));
        assert!(close(camera.current().k, 2.25));
        // The viewport center stays put.
        let center = camera.current().invert(Vec2::new(700.0, 350.0));
        assert!(close(center.x, 700.0) && close(center.y, 350.0));
    }

    #[test]
    fn gestures_interrupt_a_fly_and_keep_the_scale_in_range() {
        let mut camera = CameraController::new(&MapConfig::default());
        camera.fly_to(Time(0.0), Vec2::new(300.0, 200.0), 3.0);
        let mid = camera.tick(Time(0.9)).expect("running");

        let at = Vec2::new(100.0, 500.0);
        let under = mid.invert(at);
        camera.zoom_at(Time(0.9), at, 1.25);
        assert!(!camera.is_animating());
        assert_eq!(camera.tick(Time(2.0)), None);
        let zoomed = camera.current();
        assert!(close(zoomed.k, mid.k * 1.25));
        let still = zoomed.apply(under);
        assert!(close(still.x, at.x) && close(still.y, at.y));

        camera.pan_by(Time(2.0), Vec2::new(-40.0, 15.0));
        assert!(close(camera.current().x, zoomed.x - 40.0));
        assert!(close(camera.current().y, zoomed.y + 15.0));
        assert_eq!(camera.target(), camera.current());

        for _ in 0..40 {
            camera.zoom_at(Time(2.0), at, 1.5);
        }
        assert_eq!(camera.current().k, 8.0);
        for _ in 0..40 {
            camera.zoom_at(Time(2.0), at, 0.5);
        }
        assert_eq!(camera.current().k, 1.0);
    }

    #[test]
    fn transform_round_trips_points() {
        let t = CameraTransform::new(-120.0, 40.0, 2.5);
        let p = Vec2::new(13.0, -7.0);
        assert_eq!(t.invert(t.apply(p)), p);
        assert_eq!(CameraTransform::IDENTITY.to_svg(), "translate(0,0) scale(1)");
    }
}
