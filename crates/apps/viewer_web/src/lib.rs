use std::cell::RefCell;

use console_error_panic_hook::set_once;
use formats::{DatasetKind, LoadGate};
use foundation::math::GeoPoint;
use foundation::time::Time;
use gloo_net::http::Request;
use map::{Command, MapConfig, MapController, MapEvent, SceneTrigger};
use runtime::{ScrollAnchor, ScrollPosition};
use story::{RevealKind, StoryBoard, StoryEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod config;
mod dom;
mod gesture;
mod markup;

pub use config::{DomIds, InitOptions, ViewerConfig};
use dom::MapDom;

struct Viewer {
    controller: MapController,
    scenes: SceneTrigger,
    story: StoryBoard,
    gate: LoadGate,
    dom: MapDom,
    clock: Time,
}

thread_local! {
    static VIEWER: RefCell<Option<Viewer>> = const { RefCell::new(None) };
}

fn with_viewer<R>(f: impl FnOnce(&mut Viewer) -> R) -> Option<R> {
    VIEWER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            tracing::warn!("viewer busy; dropping re-entrant call");
            None
        }
    })
}

pub(crate) fn report(result: Result<(), JsValue>) {
    if let Err(err) = result {
        tracing::error!(?err, "DOM update failed");
    }
}

impl Viewer {
    /// Page clock; never behind the last animation frame.
    fn now(&mut self) -> Time {
        let page = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| Time::from_millis(p.now()));
        if let Some(page) = page.filter(|t| t.0 > self.clock.0) {
            self.clock = page;
        }
        self.clock
    }

    fn run(&mut self, command: Command) {
        let now = self.now();
        if let Err(err) = self.controller.dispatch(now, command) {
            tracing::debug!(%err, "command had no effect");
        }
        self.flush();
    }

    fn flush(&mut self) {
        self.dom.begin_batch();
        for event in self.controller.drain_events() {
            if matches!(event, MapEvent::Initialized { .. }) {
                report(self.dom.populate_countries(&self.controller.country_names()));
            }
            report(self.dom.apply(&event));
        }
    }

    fn apply_story(&self, events: Vec<StoryEvent>) {
        for event in &events {
            report(self.dom.apply_story(event));
        }
    }

    fn accept(&mut self, kind: DatasetKind, fetched: Result<String, String>) {
        self.gate.accept(kind, fetched);
        if let Some(outcome) = self.gate.take_ready() {
            self.controller.on_loaded(outcome);
            self.flush();
        }
    }
}

pub(crate) fn dispatch(command: Command) {
    with_viewer(|viewer| viewer.run(command));
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let response = Request::get(url).send().await.map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {} for {url}", response.status()));
    }
    response.text().await.map_err(|e| e.to_string())
}

fn map_config(options: &InitOptions) -> MapConfig {
    let Some(value) = &options.map else {
        return MapConfig::default();
    };
    MapConfig::from_json(&value.to_string()).unwrap_or_else(|err| {
        tracing::warn!(%err, "map config rejected; using defaults");
        MapConfig::default()
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    tracing_wasm::set_as_global_default();
    Ok(())
}

/// Builds the map inside `container_id` and starts loading the datasets.
///
/// `options_json` is an optional `{"viewer": {...}, "map": {...}}` object;
/// anything it leaves out keeps its default.
#[wasm_bindgen]
pub fn init_map(container_id: &str, options_json: Option<String>) -> Result<(), JsValue> {
    if VIEWER.with(|cell| cell.borrow().is_some()) {
        tracing::warn!("map already initialized");
        return Ok(());
    }
    let options: InitOptions = match options_json.as_deref() {
        Some(text) => serde_json::from_str(text).unwrap_or_else(|err| {
            tracing::warn!(%err, "init options rejected; using defaults");
            InitOptions::default()
        }),
        None => InitOptions::default(),
    };
    let config = map_config(&options);
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let mut dom = MapDom::mount(document, container_id, &config, options.viewer.ids.clone())?;
    dom.bind_controls(options.viewer.link_select_delay_ms)?;
    dom.bind_gestures()?;

    let viewer = Viewer {
        controller: MapController::new(config),
        scenes: SceneTrigger::new(),
        story: StoryBoard::new(),
        gate: LoadGate::new(),
        dom,
        clock: Time::ZERO,
    };
    VIEWER.with(|cell| *cell.borrow_mut() = Some(viewer));

    for kind in DatasetKind::ALL {
        let url = options.viewer.url(kind).to_string();
        spawn_local(async move {
            let fetched = fetch_text(&url).await;
            if let Err(err) = &fetched {
                tracing::warn!(dataset = %kind, %url, error = %err, "dataset fetch failed");
            }
            with_viewer(|viewer| viewer.accept(kind, fetched));
        });
    }
    Ok(())
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    with_viewer(|viewer| viewer.controller.is_initialized()).unwrap_or(false)
}

/// Alphabetical country names; empty before the data loads.
#[wasm_bindgen]
pub fn country_names() -> js_sys::Array {
    with_viewer(|viewer| viewer.controller.country_names())
        .unwrap_or_default()
        .iter()
        .map(|name| JsValue::from_str(name))
        .collect()
}

#[wasm_bindgen]
pub fn select_country(name: &str) {
    dispatch(Command::SelectCountry(name.to_string()));
}

#[wasm_bindgen]
pub fn fly_to(lon: f64, lat: f64, zoom: f64) {
    dispatch(Command::FlyTo {
        center: GeoPoint::new(lon, lat),
        zoom,
    });
}

#[wasm_bindgen]
pub fn fly_to_region(name: &str) {
    dispatch(Command::FlyToRegion(name.to_string()));
}

#[wasm_bindgen]
pub fn reset_view() {
    dispatch(Command::ResetView);
}

/// Clears the selection and leaves the camera where it is.
#[wasm_bindgen]
pub fn clear_selection() {
    dispatch(Command::ClearSelection);
}

/// Clears the selection and resets the camera.
#[wasm_bindgen]
pub fn reset_map() {
    dispatch(Command::Reset);
}

#[wasm_bindgen]
pub fn back_to_country() {
    dispatch(Command::Back);
}

#[wasm_bindgen]
pub fn zoom_in() {
    dispatch(Command::ZoomIn);
}

#[wasm_bindgen]
pub fn zoom_out() {
    dispatch(Command::ZoomOut);
}

#[wasm_bindgen]
pub fn set_max_routes(n: u32) {
    dispatch(Command::SetMaxRoutes(n as usize));
}

#[wasm_bindgen]
pub fn register_scene(name: &str, top: f64, height: f64) {
    with_viewer(|viewer| viewer.scenes.register(name, ScrollAnchor::new(top, height)));
}

/// Reveal kinds: `glass-card`, `finding-card`, `seat-screen`,
/// `finale-content`, `finale-credits`, `finale-wing`, `destination-bar`.
#[wasm_bindgen]
pub fn register_reveal(id: &str, kind: &str, order: u32, top: f64, height: f64) {
    let Some(kind) = RevealKind::from_name(kind, order) else {
        tracing::warn!(%id, %kind, "unknown reveal kind");
        return;
    };
    with_viewer(|viewer| {
        let pose = viewer
            .story
            .register_reveal(id, kind, ScrollAnchor::new(top, height));
        viewer.apply_story(vec![StoryEvent::Pose {
            id: id.to_string(),
            pose,
        }]);
    });
}

#[wasm_bindgen]
pub fn register_counter(id: &str, target: f64, top: f64, height: f64) {
    let target = if target.is_finite() { target.max(0.0).round() as u64 } else { 0 };
    with_viewer(|viewer| {
        let text = viewer
            .story
            .register_counter(id, target, ScrollAnchor::new(top, height));
        viewer.apply_story(vec![StoryEvent::CounterText {
            id: id.to_string(),
            text,
        }]);
    });
}

#[wasm_bindgen]
pub fn register_section(id: &str, top: f64, height: f64) {
    with_viewer(|viewer| viewer.story.register_section(id, ScrollAnchor::new(top, height)));
}

#[wasm_bindgen]
pub fn set_hero(top: f64, height: f64) {
    with_viewer(|viewer| viewer.story.set_hero(ScrollAnchor::new(top, height)));
}

#[wasm_bindgen]
pub fn set_document_height(height: f64) {
    with_viewer(|viewer| viewer.story.set_document_height(height));
}

/// Fires scenes, reveals and counters for the new scroll offset and applies
/// the scrubbed effects.
#[wasm_bindgen]
pub fn on_scroll(scroll_y: f64, viewport_height: f64) {
    with_viewer(|viewer| {
        let now = viewer.now();
        let position = ScrollPosition::new(scroll_y, viewport_height);
        for scene in viewer.scenes.update(position) {
            viewer.run(Command::SceneEnter(scene));
        }
        let events = viewer.story.on_scroll(now, position);
        viewer.apply_story(events);
    });
}

/// Advances every animation to the frame timestamp. Returns whether anything
/// is still moving.
#[wasm_bindgen]
pub fn advance_frame(now_ms: f64) -> bool {
    with_viewer(|viewer| {
        let frame = Time::from_millis(now_ms);
        if frame.0 > viewer.clock.0 {
            viewer.clock = frame;
        }
        let now = viewer.clock;
        viewer.controller.tick(now);
        viewer.flush();
        let events = viewer.story.tick(now);
        viewer.apply_story(events);
        viewer.controller.is_animating() || viewer.story.is_animating()
    })
    .unwrap_or(false)
}
