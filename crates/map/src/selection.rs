//! Selection state and its single mutation path.

use std::collections::HashSet;

use formats::Connection;
use foundation::math::Projection;
use foundation::time::Time;
use runtime::EventBus;

use crate::camera::{CameraController, CameraTransform};
use crate::config::{EdgeZoom, MapConfig};
use crate::connections::{ArcLayer, ArcVisual, ConnectionRenderer, Reveal, select_routes};
use crate::events::{ArcView, MapEvent, ShapeMark};
use crate::panel::{CountryPanel, EdgePanel, InfoPanel};
use crate::world::MapWorld;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    None,
    Country(String),
    /// The edge's source is where `back` returns to.
    Edge(Connection),
}

impl Selection {
    /// The country the selection is anchored on.
    pub fn country(&self) -> Option<&str> {
        match self {
            Selection::None => None,
            Selection::Country(name) => Some(name),
            Selection::Edge(edge) => Some(&edge.source),
        }
    }
}

/// Owns the current selection, the derived marks/arcs/panel, and the camera.
///
/// Everything that changes what is selected goes through
/// [`SelectionStore::set_selection`], which tears down the previous state
/// completely before drawing the new one.
#[derive(Debug)]
pub struct SelectionStore {
    selection: Selection,
    max_routes: usize,
    country_zoom: f64,
    edge_zoom: EdgeZoom,
    marks: Vec<ShapeMark>,
    arcs: ArcLayer,
    renderer: ConnectionRenderer,
    panel: Option<InfoPanel>,
    camera: CameraController,
}

impl SelectionStore {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            selection: Selection::None,
            max_routes: config.default_max_routes,
            country_zoom: config.country_zoom,
            edge_zoom: config.edge_zoom,
            marks: Vec::new(),
            arcs: ArcLayer::new(config.arcs.clone()),
            renderer: ConnectionRenderer::new(config.arcs.clone()),
            panel: None,
            camera: CameraController::new(config),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn max_routes(&self) -> usize {
        self.max_routes
    }

    pub fn set_max_routes(&mut self, max_routes: usize) {
        self.max_routes = max_routes;
    }

    pub fn marks(&self) -> &[ShapeMark] {
        &self.marks
    }

    pub fn arcs(&self) -> &ArcLayer {
        &self.arcs
    }

    pub fn arcs_mut(&mut self) -> &mut ArcLayer {
        &mut self.arcs
    }

    pub fn panel(&self) -> Option<&InfoPanel> {
        self.panel.as_ref()
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    pub fn transform(&self) -> CameraTransform {
        self.camera.current()
    }

    /// Replaces the selection. Re-selecting the current value redraws it.
    pub fn set_selection<P: Projection>(
        &mut self,
        now: Time,
        selection: Selection,
        world: &MapWorld,
        projection: &P,
        events: &mut EventBus<MapEvent>,
    ) {
        self.marks = vec![ShapeMark::Neutral; world.shapes.len()];
        events.emit(MapEvent::ClearHighlights);
        self.arcs.clear();
        events.emit(MapEvent::ClearArcs);
        self.panel = None;
        events.emit(MapEvent::HidePanel);

        match &selection {
            Selection::None => {}
            Selection::Country(name) => self.draw_country(now, name, world, projection, events),
            Selection::Edge(edge) => self.draw_edge(now, edge, world, projection, events),
        }

        events.emit(MapEvent::SelectionChanged {
            country: selection.country().map(str::to_string),
        });
        self.selection = selection;
    }

    /// From an edge, re-selects the edge's source country. Otherwise nothing.
    pub fn back<P: Projection>(
        &mut self,
        now: Time,
        world: &MapWorld,
        projection: &P,
        events: &mut EventBus<MapEvent>,
    ) -> bool {
        let Selection::Edge(edge) = &self.selection else {
            return false;
        };
        let source = edge.source.clone();
        self.set_selection(now, Selection::Country(source), world, projection, events);
        true
    }

    fn mark_shapes(
        &mut self,
        world: &MapWorld,
        selected: &str,
        destinations: &HashSet<&str>,
        events: &mut EventBus<MapEvent>,
    ) {
        let mut marked = Vec::new();
        for shape in &world.shapes {
            let Some(country) = shape.country.as_deref() else {
                continue;
            };
            let mark = if country == selected {
                ShapeMark::Selected
            } else if destinations.contains(country) {
                ShapeMark::Destination
            } else {
                continue;
            };
            self.marks[shape.index] = mark;
            marked.push((shape.index, mark));
        }
        events.emit(MapEvent::MarkShapes(marked));
    }

    fn emit_arcs(&self, events: &mut EventBus<MapEvent>, visuals: Vec<ArcVisual>) {
        let views = self
            .arcs
            .plans()
            .zip(visuals)
            .map(|(plan, visual)| ArcView::new(plan, visual))
            .collect();
        events.emit(MapEvent::DrawArcs(views));
    }

    fn draw_country<P: Projection>(
        &mut self,
        now: Time,
        name: &str,
        world: &MapWorld,
        projection: &P,
        events: &mut EventBus<MapEvent>,
    ) {
        let routes = select_routes(name, &world.connections, self.max_routes);
        let destinations: HashSet<&str> = routes.iter().map(|c| c.dest.as_str()).collect();
        self.mark_shapes(world, name, &destinations, events);

        if !routes.is_empty() {
            let plans = self.renderer.plan(&routes, projection);
            let visuals = self.arcs.show(now, plans, Reveal::Staggered);
            self.emit_arcs(events, visuals);
        }

        if let Some(stat) = world.stats.get(name) {
            let panel = InfoPanel::Country(CountryPanel::new(stat));
            self.panel = Some(panel.clone());
            events.emit(MapEvent::ShowPanel(panel));

            if !stat.coords.is_degenerate() {
                let focus = projection.project(stat.coords);
                self.camera.fly_to(now, focus, self.country_zoom);
            }
        }
    }

    fn draw_edge<P: Projection>(
        &mut self,
        now: Time,
        edge: &Connection,
        world: &MapWorld,
        projection: &P,
        events: &mut EventBus<MapEvent>,
    ) {
        let destinations = HashSet::from([edge.dest.as_str()]);
        self.mark_shapes(world, &edge.source, &destinations, events);

        // Keep the source's arcs on screen with the edge highlighted; an edge
        // outside the current top-N is drawn on its own.
        let routes = select_routes(&edge.source, &world.connections, self.max_routes);
        let routes = if routes.iter().any(|c| c.same_route(edge)) {
            routes
        } else {
            vec![edge.clone()]
        };
        let plans = self.renderer.plan(&routes, projection);
        self.arcs.show(now, plans, Reveal::Immediate);
        let visuals = self.arcs.select(Some(edge));
        self.emit_arcs(events, visuals);

        let panel = InfoPanel::Edge(EdgePanel::new(edge, &world.stats));
        self.panel = Some(panel.clone());
        events.emit(MapEvent::ShowPanel(panel));

        let midpoint = edge.source_coords.midpoint(edge.dest_coords);
        let zoom = self
            .edge_zoom
            .zoom_for(edge.source_coords.planar_distance(edge.dest_coords));
        self.camera.fly_to(now, projection.project(midpoint), zoom);
    }
}
