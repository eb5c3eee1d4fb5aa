//! Map configuration.
//!
//! Every knob defaults to the values the page was tuned with (a 1400x700
//! viewBox at projection scale 200). Distances and zoom constants are in
//! viewBox units and do not scale with the viewport.

use foundation::easing::Easing;
use foundation::math::GeoPoint;
use foundation::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid map config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("viewport must be positive, got {width}x{height}")]
    Viewport { width: f64, height: f64 },
    #[error("projection scale must be positive, got {0}")]
    ProjectionScale(f64),
    #[error("scale extent [{min}, {max}] is empty or non-positive")]
    ScaleExtent { min: f64, max: f64 },
    #[error("zoom factor {0} must be positive")]
    ZoomFactor(f64),
    #[error("region `{0}` is defined twice")]
    DuplicateRegion(String),
    #[error("scene `{scene}` focuses unknown region `{region}`")]
    SceneRegion { scene: String, region: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 700.0,
        }
    }
}

/// Edge focus zoom: `clamp(numerator / distance_deg, min, max)`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeZoom {
    pub numerator: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for EdgeZoom {
    fn default() -> Self {
        Self {
            numerator: 150.0,
            min: 1.5,
            max: 4.0,
        }
    }
}

impl EdgeZoom {
    pub fn zoom_for(&self, distance_deg: f64) -> f64 {
        // Coincident endpoints divide to infinity and clamp to `max`.
        let raw = self.numerator / distance_deg;
        if raw.is_nan() {
            self.max
        } else {
            raw.clamp(self.min, self.max)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcStyle {
    pub gradient_start: Rgb,
    pub gradient_end: Rgb,
    pub selected_color: Rgb,
    pub stagger_ms: f64,
    pub fade_ms: f64,
    pub rest_opacity: f64,
    pub rest_width: f64,
    pub hover_opacity: f64,
    pub hover_width: f64,
    pub selected_opacity: f64,
    pub selected_width: f64,
    /// Arc radius as a multiple of the chord length.
    pub radius_factor: f64,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self {
            gradient_start: Rgb::new(0x06, 0xb6, 0xd4),
            gradient_end: Rgb::new(0xf9, 0x73, 0x16),
            selected_color: Rgb::new(0xfb, 0xbf, 0x24),
            stagger_ms: 30.0,
            fade_ms: 500.0,
            rest_opacity: 0.6,
            rest_width: 1.5,
            hover_opacity: 1.0,
            hover_width: 3.0,
            selected_opacity: 1.0,
            selected_width: 4.0,
            radius_factor: 0.7,
        }
    }
}

/// Land colors handed to the page stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub land: Rgb,
    pub land_hover: Rgb,
    pub border: Rgb,
    pub selected: Rgb,
    pub destination: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            land: Rgb::new(0x1e, 0x29, 0x3b),
            land_hover: Rgb::new(0x33, 0x41, 0x55),
            border: Rgb::new(0x33, 0x41, 0x55),
            selected: Rgb::new(0xfb, 0xbf, 0x24),
            destination: Rgb::new(0x14, 0xb8, 0xa6),
        }
    }
}

/// A named camera preset. `scale` is a projection scale; the camera zoom is
/// `scale / projection_scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub center: GeoPoint,
    pub scale: f64,
}

impl Region {
    fn new(name: &str, lon: f64, lat: f64, scale: f64) -> Self {
        Self {
            name: name.to_string(),
            center: GeoPoint::new(lon, lat),
            scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SceneAction {
    /// Clear the selection and reset the camera to identity.
    ClearSelection,
    /// Move the camera to a region; the selection is left alone.
    FocusRegion { region: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneBinding {
    pub scene: String,
    pub action: SceneAction,
}

impl SceneBinding {
    fn focus(scene: &str) -> Self {
        Self {
            scene: scene.to_string(),
            action: SceneAction::FocusRegion {
                region: scene.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: Viewport,
    pub projection_scale: f64,
    pub scale_extent: [f64; 2],
    pub fly_duration_ms: f64,
    pub fly_easing: Easing,
    pub zoom_step_duration_ms: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub country_zoom: f64,
    pub edge_zoom: EdgeZoom,
    /// Maximum screen distance for centroid-proximity name matching.
    pub resolver_threshold: f64,
    pub default_max_routes: usize,
    pub arcs: ArcStyle,
    pub palette: Palette,
    pub regions: Vec<Region>,
    pub scenes: Vec<SceneBinding>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            projection_scale: 200.0,
            scale_extent: [1.0, 8.0],
            fly_duration_ms: 1800.0,
            fly_easing: Easing::CubicInOut,
            zoom_step_duration_ms: 300.0,
            zoom_in_factor: 1.5,
            zoom_out_factor: 0.67,
            country_zoom: 3.0,
            edge_zoom: EdgeZoom::default(),
            resolver_threshold: 100.0,
            default_max_routes: 20,
            arcs: ArcStyle::default(),
            palette: Palette::default(),
            regions: vec![
                Region::new("global", 0.0, 20.0, 200.0),
                Region::new("usa", -95.0, 38.0, 600.0),
                Region::new("europe", 10.0, 50.0, 800.0),
                Region::new("asia", 105.0, 35.0, 400.0),
                Region::new("middleeast", 50.0, 25.0, 600.0),
                Region::new("africa", 20.0, 0.0, 400.0),
                Region::new("southamerica", -60.0, -15.0, 400.0),
                Region::new("oceania", 140.0, -25.0, 400.0),
            ],
            scenes: vec![
                SceneBinding {
                    scene: "global".to_string(),
                    action: SceneAction::ClearSelection,
                },
                SceneBinding::focus("usa"),
                SceneBinding::focus("europe"),
                SceneBinding::focus("middleeast"),
                SceneBinding::focus("asia"),
            ],
        }
    }
}

impl MapConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: MapConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport { width, height } = self.viewport;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::Viewport { width, height });
        }
        if !(self.projection_scale > 0.0) {
            return Err(ConfigError::ProjectionScale(self.projection_scale));
        }
        let [min, max] = self.scale_extent;
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(ConfigError::ScaleExtent { min, max });
        }
        for factor in [self.zoom_in_factor, self.zoom_out_factor] {
            if !(factor > 0.0 && factor.is_finite()) {
                return Err(ConfigError::ZoomFactor(factor));
            }
        }
        for (i, region) in self.regions.iter().enumerate() {
            if self.regions[..i].iter().any(|r| r.name == region.name) {
                return Err(ConfigError::DuplicateRegion(region.name.clone()));
            }
        }
        for binding in &self.scenes {
            if let SceneAction::FocusRegion { region } = &binding.action {
                if self.region(region).is_none() {
                    return Err(ConfigError::SceneRegion {
                        scene: binding.scene.clone(),
                        region: region.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn scene_action(&self, scene: &str) -> Option<&SceneAction> {
        self.scenes
            .iter()
            .find(|b| b.scene == scene)
            .map(|b| &b.action)
    }

    pub fn clamp_scale(&self, k: f64) -> f64 {
        let [min, max] = self.scale_extent;
        if k.is_nan() { min } else { k.clamp(min, max) }
    }

    /// Camera zoom for a region preset.
    pub fn region_zoom(&self, region: &Region) -> f64 {
        region.scale / self.projection_scale
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EdgeZoom, MapConfig, SceneAction};
    use foundation::Rgb;

    #[test]
    fn defaults_are_valid_and_match_the_tuned_page() {
        let config = MapConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.scale_extent, [1.0, 8.0]);
        let usa = config.region("usa").expect("usa");
        assert_eq!(config.region_zoom(usa), 3.0);
        assert_eq!(config.regions.len(), 8);
        assert_eq!(config.scene_action("global"), Some(&SceneAction::ClearSelection));
        assert_eq!(config.arcs.gradient_start.to_hex(), "#06b6d4");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MapConfig::from_json(
            r##"{ "fly_duration_ms": 900, "arcs": { "gradient_end": "#ff0000" } }"##,
        )
        .expect("parse");
        assert_eq!(config.fly_duration_ms, 900.0);
        assert_eq!(config.arcs.gradient_end, Rgb::new(255, 0, 0));
        assert_eq!(config.arcs.fade_ms, 500.0);
        assert_eq!(config.default_max_routes, 20);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            MapConfig::from_json(r#"{ "scale_extent": [4, 2] }"#),
            Err(ConfigError::ScaleExtent { .. })
        ));
        assert!(matches!(
            MapConfig::from_json(r#"{ "viewport": { "width": 0, "height": 700 } }"#),
            Err(ConfigError::Viewport { .. })
        ));
        assert!(matches!(
            MapConfig::from_json(r##"{ "arcs": { "selected_color": "gold" } }"##),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            MapConfig::from_json(
                r#"{ "scenes": [ { "scene": "moon", "action": { "kind": "focus-region", "region": "moon" } } ] }"#
            ),
            Err(ConfigError::SceneRegion { .. })
        ));
    }

    #[test]
    fn edge_zoom_clamps() {
        let zoom = EdgeZoom::default();
        assert_eq!(zoom.zoom_for(10.0), 4.0);
        assert_eq!(zoom.zoom_for(60.0), 2.5);
        assert_eq!(zoom.zoom_for(200.0), 1.5);
        assert_eq!(zoom.zoom_for(0.0), 4.0);
    }

    #[test]
    fn clamp_scale_stays_in_extent() {
        let config = MapConfig::default();
        assert_eq!(config.clamp_scale(0.2), 1.0);
        assert_eq!(config.clamp_scale(12.0), 8.0);
        assert_eq!(config.clamp_scale(f64::NAN), 1.0);
    }
}
