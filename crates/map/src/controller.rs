//! Command dispatcher owning all map state.
//!
//! The page turns clicks, hovers, control changes and scroll scenes into
//! [`Command`]s; [`MapController::dispatch`] applies them in arrival order and
//! queues [`MapEvent`]s for the page to render. [`MapController::tick`]
//! advances the camera and arc fades.

use formats::{Connection, Dataset, LoadError};
use foundation::math::{GeoPoint, NaturalEarth1, Projection, Vec2};
use foundation::time::Time;
use runtime::{EventBus, Frame};
use thiserror::Error;

use crate::camera::CameraTransform;
use crate::config::{MapConfig, SceneAction};
use crate::events::MapEvent;
use crate::panel::Tooltip;
use crate::selection::{Selection, SelectionStore};
use crate::world::MapWorld;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectCountry(String),
    SelectEdge(Connection),
    ClickShape(usize),
    ClickArc(usize),
    HoverShape(usize),
    LeaveShape(usize),
    HoverArc(usize),
    LeaveArc(usize),
    /// Edge back to its source country.
    Back,
    /// Drop the selection, camera untouched.
    ClearSelection,
    /// Drop the selection and reset the camera.
    Reset,
    SceneEnter(String),
    SetMaxRoutes(usize),
    FlyTo { center: GeoPoint, zoom: f64 },
    FlyToRegion(String),
    ResetView,
    ZoomIn,
    ZoomOut,
    /// Drag by a screen-space delta in viewBox units.
    PanBy(Vec2),
    /// Wheel zoom about screen point `at`.
    ZoomAt { at: Vec2, factor: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("map is not initialized yet")]
    NotInitialized,
    #[error("map data failed to load")]
    LoadFailed,
    #[error("unknown country `{0}`")]
    UnknownCountry(String),
    #[error("unknown region `{0}`")]
    UnknownRegion(String),
    #[error("unknown scene `{0}`")]
    UnknownScene(String),
    #[error("no arc with index {0}")]
    UnknownArc(usize),
    #[error("no shape with index {0}")]
    UnknownShape(usize),
}

#[derive(Debug)]
enum LoadState {
    Loading,
    Ready(Box<MapWorld>),
    Failed(String),
}

#[derive(Debug)]
pub struct MapController<P: Projection = NaturalEarth1> {
    config: MapConfig,
    projection: P,
    load: LoadState,
    store: SelectionStore,
    frame: Option<Frame>,
    events: EventBus<MapEvent>,
}

impl MapController<NaturalEarth1> {
    pub fn new(config: MapConfig) -> Self {
        let projection = NaturalEarth1::for_viewport(
            config.projection_scale,
            config.viewport.width,
            config.viewport.height,
        );
        Self::with_projection(config, projection)
    }
}

impl<P: Projection> MapController<P> {
    pub fn with_projection(config: MapConfig, projection: P) -> Self {
        Self {
            store: SelectionStore::new(&config),
            config,
            projection,
            load: LoadState::Loading,
            frame: None,
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.load, LoadState::Ready(_))
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn world(&self) -> Option<&MapWorld> {
        match &self.load {
            LoadState::Ready(world) => Some(world.as_ref()),
            _ => None,
        }
    }

    pub fn selection(&self) -> &Selection {
        self.store.selection()
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn transform(&self) -> CameraTransform {
        self.store.transform()
    }

    /// Alphabetical country names for the picker; empty until loaded.
    pub fn country_names(&self) -> Vec<String> {
        self.world()
            .map(|w| w.stats.sorted_names())
            .unwrap_or_default()
    }

    /// Applies the outcome of the dataset load. Only the first outcome counts.
    pub fn on_loaded(&mut self, outcome: Result<Dataset, LoadError>) {
        if !matches!(self.load, LoadState::Loading) {
            tracing::warn!("map load outcome arrived twice; ignoring");
            return;
        }
        match outcome {
            Ok(dataset) => {
                let world = MapWorld::build(
                    dataset,
                    &self.projection,
                    self.config.viewport.width,
                    self.config.resolver_threshold,
                );
                tracing::info!(
                    countries = world.stats.len(),
                    connections = world.connections.len(),
                    shapes = world.shapes.len(),
                    "map initialized"
                );
                self.events.emit(MapEvent::Initialized {
                    countries: world.stats.len(),
                    connections: world.connections.len(),
                });
                self.events.emit(MapEvent::DrawShapes(world.shape_views()));
                self.load = LoadState::Ready(Box::new(world));
            }
            Err(err) => {
                tracing::error!(error = %err, "map data failed to load");
                let message = err.to_string();
                self.events.emit(MapEvent::LoadFailed {
                    message: message.clone(),
                });
                self.load = LoadState::Failed(message);
            }
        }
    }

    pub fn dispatch(&mut self, now: Time, command: Command) -> Result<(), CommandError> {
        // The routes control keeps its value even before the data arrives.
        if let Command::SetMaxRoutes(n) = &command {
            self.store.set_max_routes(*n);
        }

        let world: &MapWorld = match &self.load {
            LoadState::Ready(world) => world.as_ref(),
            LoadState::Loading => {
                tracing::debug!(?command, "map not initialized; dropping command");
                return Err(CommandError::NotInitialized);
            }
            LoadState::Failed(_) => return Err(CommandError::LoadFailed),
        };
        let projection = &self.projection;
        let store = &mut self.store;
        let events = &mut self.events;

        match command {
            Command::SelectCountry(name) => {
                if !world.stats.contains(&name) {
                    tracing::warn!(country = %name, "unknown country; selection unchanged");
                    return Err(CommandError::UnknownCountry(name));
                }
                store.set_selection(now, Selection::Country(name), world, projection, events);
            }
            Command::SelectEdge(edge) => {
                store.set_selection(now, Selection::Edge(edge), world, projection, events);
            }
            Command::ClickShape(index) => {
                let shape = world.shape(index).ok_or(CommandError::UnknownShape(index))?;
                if let Some(country) = shape.country.clone() {
                    store.set_selection(now, Selection::Country(country), world, projection, events);
                }
            }
            Command::ClickArc(index) => {
                let edge = store
                    .arcs()
                    .plan(index)
                    .map(|plan| plan.connection.clone())
                    .ok_or(CommandError::UnknownArc(index))?;
                store.set_selection(now, Selection::Edge(edge), world, projection, events);
            }
            Command::HoverShape(index) => {
                let shape = world.shape(index).ok_or(CommandError::UnknownShape(index))?;
                if let Some(stat) = shape.country.as_deref().and_then(|c| world.stats.get(c)) {
                    events.emit(MapEvent::ShowTooltip(Tooltip::country(stat)));
                }
            }
            Command::LeaveShape(index) => {
                world.shape(index).ok_or(CommandError::UnknownShape(index))?;
                events.emit(MapEvent::HideTooltip);
            }
            Command::HoverArc(index) => {
                let visual = store
                    .arcs_mut()
                    .set_hovered(index, true)
                    .ok_or(CommandError::UnknownArc(index))?;
                events.emit(MapEvent::ArcStyle(visual));
                if let Some(plan) = store.arcs().plan(index) {
                    events.emit(MapEvent::ShowTooltip(Tooltip::connection(&plan.connection)));
                }
            }
            Command::LeaveArc(index) => {
                let visual = store
                    .arcs_mut()
                    .set_hovered(index, false)
                    .ok_or(CommandError::UnknownArc(index))?;
                events.emit(MapEvent::ArcStyle(visual));
                events.emit(MapEvent::HideTooltip);
            }
            Command::Back => {
                store.back(now, world, projection, events);
            }
            Command::ClearSelection => {
                store.set_selection(now, Selection::None, world, projection, events);
            }
            Command::Reset => {
                store.set_selection(now, Selection::None, world, projection, events);
                store.camera_mut().reset(now);
            }
            Command::SceneEnter(scene) => match self.config.scene_action(&scene) {
                Some(SceneAction::ClearSelection) => {
                    store.set_selection(now, Selection::None, world, projection, events);
                    store.camera_mut().reset(now);
                }
                Some(SceneAction::FocusRegion { region }) => {
                    let region = self
                        .config
                        .region(region)
                        .ok_or_else(|| CommandError::UnknownRegion(region.clone()))?;
                    let focus = projection.project(region.center);
                    let zoom = self.config.region_zoom(region);
                    store.camera_mut().fly_to(now, focus, zoom);
                }
                None => {
                    tracing::warn!(%scene, "unknown scene; ignoring");
                    return Err(CommandError::UnknownScene(scene));
                }
            },
            Command::SetMaxRoutes(_) => {
                if let Some(country) = store.selection().country().map(str::to_string) {
                    store.set_selection(now, Selection::Country(country), world, projection, events);
                }
            }
            Command::FlyTo { center, zoom } => {
                store.camera_mut().fly_to(now, projection.project(center), zoom);
            }
            Command::FlyToRegion(name) => {
                let Some(region) = self.config.region(&name) else {
                    tracing::warn!(region = %name, "unknown region; camera unchanged");
                    return Err(CommandError::UnknownRegion(name));
                };
                let focus = projection.project(region.center);
                store.camera_mut().fly_to(now, focus, self.config.region_zoom(region));
            }
            Command::ResetView => {
                store.camera_mut().reset(now);
            }
            Command::ZoomIn => {
                store.camera_mut().zoom_by(now, self.config.zoom_in_factor);
            }
            Command::ZoomOut => {
                store.camera_mut().zoom_by(now, self.config.zoom_out_factor);
            }
            Command::PanBy(delta) => {
                store.camera_mut().pan_by(now, delta);
                events.emit(MapEvent::Transform(store.camera().current()));
            }
            Command::ZoomAt { at, factor } => {
                store.camera_mut().zoom_at(now, at, factor);
                events.emit(MapEvent::Transform(store.camera().current()));
            }
        }
        Ok(())
    }

    /// Advances animations to `now` and queues the resulting updates.
    pub fn tick(&mut self, now: Time) {
        let frame = match self.frame {
            Some(frame) => frame.advance(now),
            None => Frame::first(now),
        };
        self.frame = Some(frame);
        self.events.set_frame(frame.index);

        if let Some(transform) = self.store.camera_mut().tick(frame.time) {
            self.events.emit(MapEvent::Transform(transform));
        }
        for visual in self.store.arcs_mut().tick(frame.time) {
            self.events.emit(MapEvent::ArcStyle(visual));
        }
    }

    pub fn is_animating(&self) -> bool {
        self.store.camera().is_animating() || self.store.arcs().is_animating()
    }

    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain_payloads()
    }
}
