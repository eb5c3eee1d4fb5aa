//! TopoJSON boundary decoding.
//!
//! Only what the country layer needs: one geometry collection of polygons and
//! multipolygons, with quantized or absolute arcs. Other geometry types decode
//! to nothing.

use std::collections::HashMap;

use foundation::math::GeoPoint;
use serde::Deserialize;

use crate::error::TopologyError;

/// Object holding country polygons in the world-atlas files.
pub const COUNTRIES_OBJECT: &str = "countries";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuantizeTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<QuantizeTransform>,
    #[serde(default)]
    objects: HashMap<String, TopoObject>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum TopoObject {
    GeometryCollection {
        #[serde(default)]
        geometries: Vec<TopoGeometry>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    Polygon {
        #[serde(default)]
        id: Option<RawId>,
        #[serde(default)]
        properties: Option<Properties>,
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<RawId>,
        #[serde(default)]
        properties: Option<Properties>,
        arcs: Vec<Vec<Vec<i64>>>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn normalized(&self) -> String {
        match self {
            RawId::Text(s) => normalize_id(s),
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Numeric ids are compared without zero padding (`"036"` and `"36"` are the
/// same country). Anything else is kept as-is.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

/// One decoded country outline in geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFeature {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Polygons, each a list of closed rings (outer ring first).
    pub polygons: Vec<Vec<Vec<GeoPoint>>>,
}

impl CountryFeature {
    pub fn point_count(&self) -> usize {
        self.polygons
            .iter()
            .flat_map(|poly| poly.iter())
            .map(|ring| ring.len())
            .sum()
    }
}

pub fn parse_topology(payload: &str) -> Result<Topology, TopologyError> {
    Ok(serde_json::from_str(payload)?)
}

/// Parses a topology and decodes its country collection.
pub fn decode_countries(payload: &str) -> Result<Vec<CountryFeature>, TopologyError> {
    parse_topology(payload)?.features(COUNTRIES_OBJECT)
}

impl Topology {
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn features(&self, object: &str) -> Result<Vec<CountryFeature>, TopologyError> {
        let geometries = match self.objects.get(object) {
            Some(TopoObject::GeometryCollection { geometries }) => geometries,
            Some(TopoObject::Other) => return Err(TopologyError::NotACollection(object.to_string())),
            None => return Err(TopologyError::MissingObject(object.to_string())),
        };
        let arcs = self.decoded_arcs();

        let mut out = Vec::with_capacity(geometries.len());
        for geometry in geometries {
            let feature = match geometry {
                TopoGeometry::Polygon { id, properties, arcs: rings } => CountryFeature {
                    id: id.as_ref().map(RawId::normalized),
                    name: properties.as_ref().and_then(|p| p.name.clone()),
                    polygons: vec![polygon(&arcs, rings)?],
                },
                TopoGeometry::MultiPolygon { id, properties, arcs: polys } => CountryFeature {
                    id: id.as_ref().map(RawId::normalized),
                    name: properties.as_ref().and_then(|p| p.name.clone()),
                    polygons: polys
                        .iter()
                        .map(|rings| polygon(&arcs, rings))
                        .collect::<Result<_, _>>()?,
                },
                TopoGeometry::Other => continue,
            };
            out.push(feature);
        }
        Ok(out)
    }

    /// Absolute arc coordinates, undoing delta quantization when a transform
    /// is present.
    fn decoded_arcs(&self) -> Vec<Vec<GeoPoint>> {
        self.arcs
            .iter()
            .map(|arc| {
                let mut x = 0.0;
                let mut y = 0.0;
                arc.iter()
                    .map(|position| {
                        let px = position.first().copied().unwrap_or(0.0);
                        let py = position.get(1).copied().unwrap_or(0.0);
                        match &self.transform {
                            Some(t) => {
                                x += px;
                                y += py;
                                GeoPoint::new(
                                    x * t.scale[0] + t.translate[0],
                                    y * t.scale[1] + t.translate[1],
                                )
                            }
                            None => GeoPoint::new(px, py),
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

fn polygon(arcs: &[Vec<GeoPoint>], rings: &[Vec<i64>]) -> Result<Vec<Vec<GeoPoint>>, TopologyError> {
    rings.iter().map(|ring| stitch_ring(arcs, ring)).collect()
}

/// Joins arcs into one ring. Consecutive arcs share an endpoint, so the
/// previous arc's last point is dropped before appending. A negative index
/// `~i` means arc `i` reversed.
fn stitch_ring(arcs: &[Vec<GeoPoint>], indices: &[i64]) -> Result<Vec<GeoPoint>, TopologyError> {
    let mut points: Vec<GeoPoint> = Vec::new();
    for &index in indices {
        let (arc_index, reversed) = if index < 0 {
            ((!index) as usize, true)
        } else {
            (index as usize, false)
        };
        let arc = arcs.get(arc_index).ok_or(TopologyError::ArcOutOfRange {
            index,
            arcs: arcs.len(),
        })?;
        points.pop();
        if reversed {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
    }
    // Degenerate rings are padded so every ring is closed with four points.
    if let Some(&first) = points.first() {
        while points.len() < 4 {
            points.push(first);
        }
    }
    Ok(points)
}
