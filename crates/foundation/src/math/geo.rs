use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
///
/// Serialized as a `[lon, lat]` pair, which is how every dataset on the page
/// stores coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// True when both components are finite and inside lon ∈ [-180, 180],
    /// lat ∈ [-90, 90].
    pub fn is_valid(self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// `[0, 0]` marks "location unknown" in the stats table; invalid points are
    /// treated the same way.
    pub fn is_degenerate(self) -> bool {
        (self.lon == 0.0 && self.lat == 0.0) || !self.is_valid()
    }

    /// Planar distance in degrees. Deliberately not great-circle.
    pub fn planar_distance(self, other: Self) -> f64 {
        let dlon = other.lon - self.lon;
        let dlat = other.lat - self.lat;
        (dlon * dlon + dlat * dlat).sqrt()
    }

    /// Planar midpoint in degrees.
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.lon + other.lon) / 2.0, (self.lat + other.lat) / 2.0)
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lon, p.lat]
    }
}
