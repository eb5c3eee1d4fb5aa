//! Applies map and story events to the page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use foundation::math::Vec2;
use map::{ArcView, Command, MapConfig, MapEvent, ShapeView};
use story::{HeroFrame, Pose, StoryEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement, MouseEvent, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, WheelEvent,
};

use crate::config::DomIds;
use crate::gesture::{Drag, ViewBoxFit, wheel_factor};
use crate::markup::{BACK_BUTTON_CLASS, escape, panel_html, tooltip_html};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

type Listener = Closure<dyn FnMut(Event)>;

fn listen(target: &Element, kind: &str, handler: impl FnMut(Event) + 'static) -> Result<Listener, JsValue> {
    let listener: Listener = Closure::new(handler);
    target.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
    Ok(listener)
}

fn set_style(element: &Element, property: &str, value: &str) -> Result<(), JsValue> {
    match element.dyn_ref::<HtmlElement>() {
        Some(html) => html.style().set_property(property, value),
        None => element.set_attribute("style", &format!("{property}: {value}")),
    }
}

/// The element drawn for plan `index`; plans may skip indices.
fn keyed<T>(items: &[(usize, T)], index: usize) -> Option<&T> {
    items.iter().find(|(key, _)| *key == index).map(|(_, item)| item)
}

fn client_point(mouse: &MouseEvent) -> Vec2 {
    Vec2::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()))
}

fn fit_of(svg: &Element, viewport: Vec2) -> Option<ViewBoxFit> {
    let rect = svg.get_bounding_client_rect();
    ViewBoxFit::new(
        Vec2::new(rect.left(), rect.top()),
        Vec2::new(rect.width(), rect.height()),
        viewport,
    )
}

/// Scrolls the map into view, then selects `country` once the scroll has
/// had `delay_ms` to settle.
fn select_after_scroll(document: &Document, section_id: &str, country: String, delay_ms: i32) -> Result<(), JsValue> {
    if let Some(section) = document.get_element_by_id(section_id) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        section.scroll_into_view_with_scroll_into_view_options(&options);
    }
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let select = Closure::once_into_js(move || crate::select_country(&country));
    window.set_timeout_with_callback_and_timeout_and_arguments_0(select.unchecked_ref(), delay_ms)?;
    Ok(())
}

fn set_visible(element: &Element, visible: bool) -> Result<(), JsValue> {
    if visible {
        element.class_list().add_1("visible")
    } else {
        element.class_list().remove_1("visible")
    }
}

pub struct MapDom {
    document: Document,
    svg: Element,
    viewport: Vec2,
    root: Element,
    map_group: Element,
    connections_group: Element,
    panel: Option<Element>,
    tooltip: Option<Element>,
    country_select: Option<HtmlSelectElement>,
    shapes: Vec<Element>,
    /// Drawn arcs keyed by plan index.
    arcs: Vec<(usize, Element)>,
    ids: DomIds,
    /// Set when a press turned into a drag, so its trailing click is ignored.
    dragged: Rc<Cell<bool>>,
    shape_listeners: Vec<Listener>,
    arc_listeners: Vec<Listener>,
    panel_listener: Option<Listener>,
    control_listeners: Vec<Listener>,
    gesture_listeners: Vec<Listener>,
    /// Listeners whose elements were replaced during the current batch. One
    /// of them may be running, so they are dropped at the next batch.
    retired: Vec<Listener>,
}

impl MapDom {
    pub fn mount(document: Document, container_id: &str, config: &MapConfig, ids: DomIds) -> Result<Self, JsValue> {
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {container_id}")))?;
        let svg = document.create_element_ns(Some(SVG_NS), "svg")?;
        svg.set_attribute("width", "100%")?;
        svg.set_attribute("height", "100%")?;
        svg.set_attribute(
            "viewBox",
            &format!("0 0 {} {}", config.viewport.width, config.viewport.height),
        )?;
        svg.set_attribute("preserveAspectRatio", "xMidYMid meet")?;

        let root = document.create_element_ns(Some(SVG_NS), "g")?;
        let map_group = document.create_element_ns(Some(SVG_NS), "g")?;
        map_group.set_attribute("class", "map-group")?;
        let connections_group = document.create_element_ns(Some(SVG_NS), "g")?;
        connections_group.set_attribute("class", "connections-group")?;
        root.append_child(&map_group)?;
        root.append_child(&connections_group)?;
        svg.append_child(&root)?;
        container.append_child(&svg)?;

        Ok(Self {
            panel: document.get_element_by_id(&ids.panel),
            tooltip: document.get_element_by_id(&ids.tooltip),
            country_select: document
                .get_element_by_id(&ids.country_select)
                .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok()),
            document,
            svg,
            viewport: Vec2::new(config.viewport.width, config.viewport.height),
            root,
            map_group,
            connections_group,
            shapes: Vec::new(),
            arcs: Vec::new(),
            ids,
            dragged: Rc::new(Cell::new(false)),
            shape_listeners: Vec::new(),
            arc_listeners: Vec::new(),
            panel_listener: None,
            control_listeners: Vec::new(),
            gesture_listeners: Vec::new(),
            retired: Vec::new(),
        })
    }

    /// Wires the zoom buttons, reset button, routes slider, dropdown and the
    /// page's country links.
    pub fn bind_controls(&mut self, link_delay_ms: u32) -> Result<(), JsValue> {
        let buttons: [(&str, fn()); 4] = [
            (self.ids.zoom_in.as_str(), crate::zoom_in as fn()),
            (self.ids.zoom_out.as_str(), crate::zoom_out as fn()),
            (self.ids.zoom_reset.as_str(), crate::reset_view as fn()),
            (self.ids.reset.as_str(), crate::reset_map as fn()),
        ];
        let mut listeners = Vec::new();
        for (id, action) in buttons {
            if let Some(button) = self.document.get_element_by_id(id) {
                listeners.push(listen(&button, "click", move |_| action())?);
            }
        }

        if let Some(slider) = self
            .document
            .get_element_by_id(&self.ids.max_routes)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            let label = self.document.get_element_by_id(&self.ids.routes_value);
            let input = slider.clone();
            listeners.push(listen(&slider, "input", move |_| {
                let value = input.value();
                if let Some(label) = &label {
                    label.set_text_content(Some(&value));
                }
                match value.parse::<u32>() {
                    Ok(n) => crate::set_max_routes(n),
                    Err(_) => tracing::warn!(%value, "max routes is not a number"),
                }
            })?);
        }

        if let Some(select) = &self.country_select {
            let input = select.clone();
            listeners.push(listen(select, "change", move |_| {
                let value = input.value();
                if !value.is_empty() {
                    crate::select_country(&value);
                }
            })?);
        }

        let delay_ms = i32::try_from(link_delay_ms).unwrap_or(i32::MAX);
        for selector in &self.ids.country_links {
            let items = self.document.query_selector_all(selector)?;
            for item in (0..items.length()).filter_map(|i| items.item(i)) {
                let Ok(item) = item.dyn_into::<Element>() else {
                    continue;
                };
                set_style(&item, "cursor", "pointer")?;
                let document = self.document.clone();
                let section = self.ids.map_section.clone();
                let link = item.clone();
                listeners.push(listen(&item, "click", move |_| {
                    let Some(country) = link.get_attribute("data-country").filter(|c| !c.is_empty()) else {
                        return;
                    };
                    tracing::debug!(%country, "country link clicked");
                    crate::report(select_after_scroll(&document, &section, country, delay_ms));
                })?);
            }
        }

        self.control_listeners = listeners;
        Ok(())
    }

    /// Drag to pan and wheel to zoom on the map.
    pub fn bind_gestures(&mut self) -> Result<(), JsValue> {
        let drag: Rc<RefCell<Option<Drag>>> = Rc::new(RefCell::new(None));
        let mut listeners = Vec::new();

        let (svg, viewport) = (self.svg.clone(), self.viewport);
        listeners.push(listen(&self.svg, "wheel", move |event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            event.prevent_default();
            if let Some(fit) = fit_of(&svg, viewport) {
                crate::dispatch(Command::ZoomAt {
                    at: fit.to_viewbox(client_point(wheel)),
                    factor: wheel_factor(wheel.delta_y(), wheel.delta_mode()),
                });
            }
        })?);

        let (svg, pressed, dragged) = (self.svg.clone(), drag.clone(), self.dragged.clone());
        listeners.push(listen(&self.svg, "mousedown", move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>().filter(|m| m.button() == 0) else {
                return;
            };
            dragged.set(false);
            *pressed.borrow_mut() = fit_of(&svg, viewport).map(|fit| Drag::start(fit, client_point(mouse)));
        })?);

        let moving = drag.clone();
        listeners.push(listen(&self.svg, "mousemove", move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let delta = match moving.borrow_mut().as_mut() {
                Some(drag) => drag.move_to(client_point(mouse)),
                None => return,
            };
            crate::dispatch(Command::PanBy(delta));
        })?);

        for kind in ["mouseup", "mouseleave"] {
            let (released, dragged) = (drag.clone(), self.dragged.clone());
            listeners.push(listen(&self.svg, kind, move |_| {
                if let Some(drag) = released.borrow_mut().take() {
                    dragged.set(!drag.is_click());
                }
            })?);
        }

        self.gesture_listeners = listeners;
        Ok(())
    }

    /// Drops listeners retired by the previous batch.
    pub fn begin_batch(&mut self) {
        self.retired.clear();
    }

    pub fn populate_countries(&self, names: &[String]) -> Result<(), JsValue> {
        let Some(select) = &self.country_select else {
            return Ok(());
        };
        for name in names {
            let option = self.document.create_element("option")?;
            option.set_attribute("class", "country-option")?;
            option.set_attribute("value", name)?;
            option.set_text_content(Some(name));
            select.append_child(&option)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, event: &MapEvent) -> Result<(), JsValue> {
        match event {
            MapEvent::Initialized { .. } => {
                if let Some(loading) = self.document.query_selector(".loading-indicator")? {
                    set_style(&loading, "display", "none")?;
                }
            }
            MapEvent::LoadFailed { message } => {
                if let Some(loading) = self.document.query_selector(".loading-indicator")? {
                    loading.set_inner_html(&format!(
                        r#"<div class="load-error"><p>Error loading map data</p><p>{}</p></div>"#,
                        escape(message)
                    ));
                }
            }
            MapEvent::DrawShapes(views) => self.draw_shapes(views)?,
            MapEvent::ClearHighlights => {
                for shape in &self.shapes {
                    shape.class_list().remove_2("selected", "destination")?;
                }
            }
            MapEvent::MarkShapes(marks) => {
                for (index, mark) in marks {
                    if let (Some(shape), Some(class)) = (self.shapes.get(*index), mark.class()) {
                        shape.class_list().add_1(class)?;
                    }
                }
            }
            MapEvent::ClearArcs => {
                self.connections_group.set_inner_html("");
                self.arcs.clear();
                self.retired.append(&mut self.arc_listeners);
            }
            MapEvent::DrawArcs(views) => self.draw_arcs(views)?,
            MapEvent::ArcStyle(visual) => {
                if let Some(arc) = keyed(&self.arcs, visual.index) {
                    arc.set_attribute("stroke", &visual.color.to_hex())?;
                    arc.set_attribute("stroke-opacity", &visual.opacity.to_string())?;
                    arc.set_attribute("stroke-width", &visual.width.to_string())?;
                }
            }
            MapEvent::HidePanel => {
                if let Some(panel) = &self.panel {
                    set_visible(panel, false)?;
                }
                self.retired.extend(self.panel_listener.take());
            }
            MapEvent::ShowPanel(info) => {
                if let Some(panel) = &self.panel {
                    panel.set_inner_html(&panel_html(info));
                    set_visible(panel, true)?;
                    if let Some(back) = panel.query_selector(&format!(".{BACK_BUTTON_CLASS}"))? {
                        let listener = listen(&back, "click", |_| crate::back_to_country())?;
                        self.retired.extend(self.panel_listener.replace(listener));
                    }
                }
            }
            MapEvent::SelectionChanged { country } => {
                if let Some(select) = &self.country_select {
                    select.set_value(country.as_deref().unwrap_or(""));
                }
            }
            MapEvent::Transform(transform) => {
                self.root.set_attribute("transform", &transform.to_svg())?;
            }
            MapEvent::ShowTooltip(tooltip) => {
                if let Some(element) = &self.tooltip {
                    element.set_inner_html(&tooltip_html(tooltip));
                    set_visible(element, true)?;
                }
            }
            MapEvent::HideTooltip => {
                if let Some(element) = &self.tooltip {
                    set_visible(element, false)?;
                }
            }
        }
        Ok(())
    }

    fn follow_pointer(&self, element: &Element) -> Result<Option<Listener>, JsValue> {
        let Some(tooltip) = self.tooltip.clone() else {
            return Ok(None);
        };
        let listener = listen(element, "mousemove", move |event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                crate::report(set_style(&tooltip, "left", &format!("{}px", mouse.page_x() + 15)));
                crate::report(set_style(&tooltip, "top", &format!("{}px", mouse.page_y() - 10)));
            }
        })?;
        Ok(Some(listener))
    }

    fn draw_shapes(&mut self, views: &[ShapeView]) -> Result<(), JsValue> {
        self.map_group.set_inner_html("");
        self.shapes.clear();
        self.retired.append(&mut self.shape_listeners);
        for view in views {
            let path = self.document.create_element_ns(Some(SVG_NS), "path")?;
            path.set_attribute("d", &view.path)?;
            path.set_attribute("class", "country")?;
            if let Some(country) = &view.country {
                path.set_attribute("data-country", country)?;
            }
            if view.interactive {
                let index = view.index;
                path.class_list().add_1("interactive")?;
                let dragged = self.dragged.clone();
                self.shape_listeners.push(listen(&path, "click", move |_| {
                    if !dragged.get() {
                        crate::dispatch(Command::ClickShape(index));
                    }
                })?);
                self.shape_listeners.push(listen(&path, "mouseenter", move |_| {
                    crate::dispatch(Command::HoverShape(index))
                })?);
                self.shape_listeners.push(listen(&path, "mouseleave", move |_| {
                    crate::dispatch(Command::LeaveShape(index))
                })?);
                let pointer = self.follow_pointer(&path)?;
                self.shape_listeners.extend(pointer);
            }
            self.map_group.append_child(&path)?;
            self.shapes.push(path);
        }
        Ok(())
    }

    fn draw_arcs(&mut self, views: &[ArcView]) -> Result<(), JsValue> {
        for view in views {
            let path = self.document.create_element_ns(Some(SVG_NS), "path")?;
            path.set_attribute("class", "connection-arc")?;
            path.set_attribute("d", &view.path)?;
            path.set_attribute("fill", "none")?;
            path.set_attribute("data-source", &view.connection.source)?;
            path.set_attribute("data-dest", &view.connection.dest)?;
            path.set_attribute("stroke", &view.color.to_hex())?;
            path.set_attribute("stroke-opacity", &view.opacity.to_string())?;
            path.set_attribute("stroke-width", &view.width.to_string())?;
            let index = view.index;
            let dragged = self.dragged.clone();
            self.arc_listeners.push(listen(&path, "click", move |event| {
                // Keep the click off the country underneath.
                event.stop_propagation();
                if !dragged.get() {
                    crate::dispatch(Command::ClickArc(index));
                }
            })?);
            self.arc_listeners.push(listen(&path, "mouseenter", move |_| {
                crate::dispatch(Command::HoverArc(index))
            })?);
            self.arc_listeners.push(listen(&path, "mouseleave", move |_| {
                crate::dispatch(Command::LeaveArc(index))
            })?);
            let pointer = self.follow_pointer(&path)?;
            self.arc_listeners.extend(pointer);
            self.connections_group.append_child(&path)?;
            self.arcs.push((view.index, path));
        }
        Ok(())
    }

    pub fn apply_story(&self, event: &StoryEvent) -> Result<(), JsValue> {
        match event {
            StoryEvent::Pose { id, pose } => {
                if let Some(element) = self.document.get_element_by_id(id) {
                    apply_pose(&element, pose)?;
                }
            }
            StoryEvent::CounterText { id, text } => {
                if let Some(element) = self.document.get_element_by_id(id) {
                    element.set_text_content(Some(text));
                }
            }
            StoryEvent::ProgressWidth(percent) => {
                if let Some(bar) = self.document.query_selector(".progress-bar")? {
                    set_style(&bar, "width", &format!("{percent}%"))?;
                }
            }
            StoryEvent::Hero(frame) => self.apply_hero(frame)?,
            StoryEvent::SectionOffset { id, y } => {
                let card = match self.document.get_element_by_id(id) {
                    Some(section) => section.query_selector(".glass-card")?,
                    None => None,
                };
                if let Some(card) = card {
                    set_style(&card, "transform", &format!("translateY({y}px)"))?;
                }
            }
        }
        Ok(())
    }

    fn apply_hero(&self, frame: &HeroFrame) -> Result<(), JsValue> {
        for (selector, y) in [(".cloud-1", frame.clouds[0]), (".cloud-2", frame.clouds[1])] {
            if let Some(cloud) = self.document.query_selector(selector)? {
                set_style(&cloud, "transform", &format!("translateY({y}px)"))?;
            }
        }
        if let Some(content) = self.document.query_selector(".window-content")? {
            set_style(&content, "opacity", &frame.content_opacity.to_string())?;
            set_style(&content, "transform", &format!("translateY({}px)", frame.content_y))?;
        }
        if let Some(indicator) = self.document.query_selector(".scroll-indicator")? {
            set_style(&indicator, "opacity", &frame.indicator_opacity.to_string())?;
        }
        if let Some(window) = self.document.query_selector("#hero-window .airplane-window")? {
            set_style(&window, "opacity", &frame.window_opacity.to_string())?;
            set_style(&window, "transform", &format!("scale({})", frame.window_scale))?;
        }
        Ok(())
    }
}

fn apply_pose(element: &Element, pose: &Pose) -> Result<(), JsValue> {
    set_style(element, "opacity", &pose.opacity.to_string())?;
    set_style(
        element,
        "transform",
        &format!(
            "translate({}px, {}px) scale({}) scaleX({})",
            pose.x, pose.y, pose.scale, pose.fill
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::keyed;
    use pretty_assertions::assert_eq;

    #[test]
    fn arcs_are_found_by_plan_index_not_position() {
        // Plan 1 did not project, so plan 2 sits second.
        let arcs = [(0, "to-d"), (2, "to-c")];
        assert_eq!(keyed(&arcs, 2), Some(&"to-c"));
        assert_eq!(keyed(&arcs, 1), None);
        assert_eq!(keyed(&arcs, 0), Some(&"to-d"));
    }
}
