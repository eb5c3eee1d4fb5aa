//! Projected country outlines: an SVG path plus a planar centroid.

use std::fmt::Write as _;

use foundation::math::{Projection, Vec2};

use crate::topology::CountryFeature;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedShape {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Area-weighted centroid in viewBox units; `None` for empty outlines.
    pub centroid: Option<Vec2>,
    /// SVG path data (`M`/`L`/`Z`).
    pub path: String,
}

/// Projects every ring of `feature` and builds its path.
///
/// Rings that jump more than half the viewport horizontally between two
/// vertices wrap the antimeridian; those get split into separate open
/// subpaths instead of drawing a line across the map.
pub fn project_feature<P: Projection>(
    feature: &CountryFeature,
    projection: &P,
    viewport_width: f64,
) -> ProjectedShape {
    let rings: Vec<Vec<Vec2>> = feature
        .polygons
        .iter()
        .flat_map(|poly| poly.iter())
        .map(|ring| ring.iter().map(|&p| projection.project(p)).collect())
        .collect();

    ProjectedShape {
        id: feature.id.clone(),
        name: feature.name.clone(),
        centroid: centroid(&rings),
        path: svg_path(&rings, viewport_width / 2.0),
    }
}

fn svg_path(rings: &[Vec<Vec2>], max_jump: f64) -> String {
    let mut out = String::new();
    for ring in rings {
        let Some(first) = ring.first() else {
            continue;
        };
        let _ = write!(out, "M{:.2},{:.2}", first.x, first.y);
        let mut split = false;
        for pair in ring.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let cmd = if (next.x - prev.x).abs() > max_jump {
                split = true;
                'M'
            } else {
                'L'
            };
            let _ = write!(out, "{cmd}{:.2},{:.2}", next.x, next.y);
        }
        if !split {
            out.push('Z');
        }
    }
    out
}

/// Planar polygon centroid over all rings; hole rings subtract through
/// their opposite winding. Falls back to the vertex mean when the total
/// area vanishes.
fn centroid(rings: &[Vec<Vec2>]) -> Option<Vec2> {
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut sum = Vec2::ZERO;
    let mut count = 0usize;

    for ring in rings {
        for (i, &a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            let cross = a.x * b.y - b.x * a.y;
            area2 += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
            sum = sum + a;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    let c = if area2.abs() > 1e-9 {
        Vec2::new(cx / (3.0 * area2), cy / (3.0 * area2))
    } else {
        sum / count as f64
    };
    c.is_finite().then_some(c)
}
