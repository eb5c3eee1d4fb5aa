//! Render commands emitted by the map controller.

use formats::Connection;
use foundation::Rgb;

use crate::camera::CameraTransform;
use crate::connections::{ArcPlan, ArcVisual};
use crate::panel::{InfoPanel, Tooltip};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShapeMark {
    Neutral,
    Selected,
    Destination,
}

impl ShapeMark {
    /// CSS class for the mark, if any.
    pub fn class(self) -> Option<&'static str> {
        match self {
            ShapeMark::Neutral => None,
            ShapeMark::Selected => Some("selected"),
            ShapeMark::Destination => Some("destination"),
        }
    }
}

/// One country outline to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeView {
    pub index: usize,
    pub country: Option<String>,
    /// Interactive shapes take clicks and show tooltips.
    pub interactive: bool,
    pub path: String,
}

/// One arc to draw, with its starting stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcView {
    pub index: usize,
    pub connection: Connection,
    pub path: String,
    pub color: Rgb,
    pub opacity: f64,
    pub width: f64,
}

impl ArcView {
    pub fn new(plan: &ArcPlan, visual: ArcVisual) -> Self {
        Self {
            index: plan.index,
            connection: plan.connection.clone(),
            path: plan.path.clone(),
            color: visual.color,
            opacity: visual.opacity,
            width: visual.width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Initialized { countries: usize, connections: usize },
    LoadFailed { message: String },
    DrawShapes(Vec<ShapeView>),
    /// Every shape back to neutral.
    ClearHighlights,
    /// Non-neutral marks only.
    MarkShapes(Vec<(usize, ShapeMark)>),
    ClearArcs,
    DrawArcs(Vec<ArcView>),
    ArcStyle(ArcVisual),
    HidePanel,
    ShowPanel(InfoPanel),
    /// The country the selection is about, for the dropdown.
    SelectionChanged { country: Option<String> },
    Transform(CameraTransform),
    ShowTooltip(Tooltip),
    HideTooltip,
}
