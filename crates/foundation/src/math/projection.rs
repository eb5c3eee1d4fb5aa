//! Map projections from geographic degrees to screen (viewBox) units.

use super::{GeoPoint, Vec2};

/// A pure lon/lat <-> screen mapping.
pub trait Projection {
    fn project(&self, p: GeoPoint) -> Vec2;

    /// Inverse mapping. `None` when the point is outside the projected domain.
    fn invert(&self, p: Vec2) -> Option<GeoPoint>;
}

/// Natural Earth I pseudo-cylindrical projection (Šavrič et al. polynomial),
/// scaled by `scale` and centered on `translate`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NaturalEarth1 {
    pub scale: f64,
    pub translate: Vec2,
}

const INVERT_EPSILON: f64 = 1e-6;
const INVERT_ITERATIONS: usize = 25;

impl NaturalEarth1 {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Projection sized for a viewBox, centered in it.
    pub fn for_viewport(scale: f64, width: f64, height: f64) -> Self {
        Self::new(scale, Vec2::new(width / 2.0, height / 2.0))
    }
}

fn raw(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}

fn raw_invert(x: f64, y: f64) -> (f64, f64) {
    // Newton iteration on the y polynomial.
    let mut phi = y;
    for _ in 0..INVERT_ITERATIONS {
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        let f = phi
            * (1.007226
                + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)))
            - y;
        let df = 1.007226
            + phi2
                * (0.015085 * 3.0
                    + phi4 * (-0.044475 * 7.0 + 0.028874 * 9.0 * phi2 - 0.005916 * 11.0 * phi4));
        let delta = f / df;
        phi -= delta;
        if delta.abs() <= INVERT_EPSILON {
            break;
        }
    }
    let phi2 = phi * phi;
    let lambda = x
        / (0.8707
            + phi2 * (-0.131979 + phi2 * (-0.013791 + phi2 * phi2 * phi2 * (0.003971 - 0.001529 * phi2))));
    (lambda, phi)
}

impl Projection for NaturalEarth1 {
    fn project(&self, p: GeoPoint) -> Vec2 {
        let (x, y) = raw(p.lon.to_radians(), p.lat.to_radians());
        Vec2::new(
            self.translate.x + self.scale * x,
            self.translate.y - self.scale * y,
        )
    }

    fn invert(&self, p: Vec2) -> Option<GeoPoint> {
        if self.scale == 0.0 || !p.is_finite() {
            return None;
        }
        let x = (p.x - self.translate.x) / self.scale;
        let y = (self.translate.y - p.y) / self.scale;
        let (lambda, phi) = raw_invert(x, y);
        let out = GeoPoint::new(lambda.to_degrees(), phi.to_degrees());
        out.is_valid().then_some(out)
    }
}
