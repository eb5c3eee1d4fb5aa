//! The loaded, read-only side of the map.

use formats::{Connection, Dataset, StatsTable, project_feature};
use foundation::math::{Projection, Vec2};

use crate::events::ShapeView;
use crate::resolver::EntityResolver;

/// A projected country outline and the stats entry it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct MapShape {
    pub index: usize,
    pub id: Option<String>,
    /// Set only when the resolved name has stats; such shapes are interactive.
    pub country: Option<String>,
    pub centroid: Option<Vec2>,
    pub path: String,
}

impl MapShape {
    pub fn is_interactive(&self) -> bool {
        self.country.is_some()
    }

    pub fn view(&self) -> ShapeView {
        ShapeView {
            index: self.index,
            country: self.country.clone(),
            interactive: self.is_interactive(),
            path: self.path.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapWorld {
    pub stats: StatsTable,
    pub connections: Vec<Connection>,
    pub shapes: Vec<MapShape>,
}

impl MapWorld {
    pub fn build<P: Projection>(dataset: Dataset, projection: &P, viewport_width: f64, resolver_threshold: f64) -> Self {
        let resolver = EntityResolver::new(&dataset.stats, projection, resolver_threshold);
        Self::build_with(dataset, projection, viewport_width, &resolver)
    }

    pub fn build_with<P: Projection>(
        dataset: Dataset,
        projection: &P,
        viewport_width: f64,
        resolver: &EntityResolver,
    ) -> Self {
        let Dataset {
            boundaries,
            connections,
            stats,
        } = dataset;
        let shapes: Vec<MapShape> = boundaries
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                let projected = project_feature(feature, projection, viewport_width);
                let country = resolver
                    .resolve(projected.id.as_deref(), projected.centroid)
                    .filter(|name| stats.contains(name))
                    .map(str::to_string);
                MapShape {
                    index,
                    id: projected.id,
                    country,
                    centroid: projected.centroid,
                    path: projected.path,
                }
            })
            .collect();
        let unresolved = shapes.iter().filter(|s| !s.is_interactive()).count();
        tracing::debug!(shapes = shapes.len(), unresolved, "country shapes resolved");
        Self {
            stats,
            connections,
            shapes,
        }
    }

    pub fn shape(&self, index: usize) -> Option<&MapShape> {
        self.shapes.get(index)
    }

    pub fn shape_views(&self) -> Vec<ShapeView> {
        self.shapes.iter().map(MapShape::view).collect()
    }
}
