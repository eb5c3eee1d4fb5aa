//! One-shot reveals: elements start hidden and animate in the first time
//! their top edge crosses a viewport line.

use foundation::easing::Easing;
use foundation::time::Time;
use runtime::{Interpolate, ScrollAnchor, ScrollPosition, Step, TransitionSlot, TransitionSpec};

/// Delay between consecutive finding cards.
pub const FINDING_STAGGER_MS: f64 = 150.0;

/// Visual state of a revealed element.
///
/// Offsets are CSS pixels; `fill` is the fraction of a bar's target width.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    pub opacity: f64,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub fill: f64,
}

impl Pose {
    pub const SHOWN: Pose = Pose {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        fill: 1.0,
    };

    fn hidden(opacity: f64) -> Self {
        Pose { opacity, ..Self::SHOWN }
    }
}

impl Interpolate for Pose {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        Pose {
            opacity: self.opacity.interpolate(&other.opacity, t),
            x: self.x.interpolate(&other.x, t),
            y: self.y.interpolate(&other.y, t),
            scale: self.scale.interpolate(&other.scale, t),
            fill: self.fill.interpolate(&other.fill, t),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevealKind {
    GlassCard,
    /// `order` is the card's position in the findings grid.
    FindingCard { order: u32 },
    SeatScreen,
    FinaleContent,
    FinaleCredits,
    FinaleWing,
    DestinationBar,
}

impl RevealKind {
    /// Parses the page's kind names; `order` only matters for finding cards.
    pub fn from_name(name: &str, order: u32) -> Option<Self> {
        Some(match name {
            "glass-card" => RevealKind::GlassCard,
            "finding-card" => RevealKind::FindingCard { order },
            "seat-screen" => RevealKind::SeatScreen,
            "finale-content" => RevealKind::FinaleContent,
            "finale-credits" => RevealKind::FinaleCredits,
            "finale-wing" => RevealKind::FinaleWing,
            "destination-bar" => RevealKind::DestinationBar,
            _ => return None,
        })
    }

    pub fn spec(self) -> RevealSpec {
        let out = |ms| TransitionSpec::millis(ms, Easing::CubicOut);
        match self {
            RevealKind::GlassCard => RevealSpec {
                line: 0.85,
                hidden: Pose { y: 40.0, ..Pose::hidden(0.0) },
                transition: out(800.0),
            },
            RevealKind::FindingCard { order } => RevealSpec {
                line: 0.85,
                hidden: Pose { y: 30.0, ..Pose::hidden(0.0) },
                transition: out(800.0).with_delay_ms(f64::from(order) * FINDING_STAGGER_MS),
            },
            RevealKind::SeatScreen => RevealSpec {
                line: 0.8,
                hidden: Pose { scale: 0.95, ..Pose::hidden(0.0) },
                transition: out(800.0),
            },
            RevealKind::FinaleContent => RevealSpec {
                line: 0.6,
                hidden: Pose { y: 30.0, ..Pose::hidden(0.0) },
                transition: out(1000.0),
            },
            RevealKind::FinaleCredits => RevealSpec {
                line: 0.6,
                hidden: Pose { y: 20.0, ..Pose::hidden(0.0) },
                transition: out(1000.0).with_delay_ms(500.0),
            },
            RevealKind::FinaleWing => RevealSpec {
                line: 0.6,
                hidden: Pose { x: 30.0, ..Pose::hidden(0.0) },
                transition: out(1500.0).with_delay_ms(800.0),
            },
            RevealKind::DestinationBar => RevealSpec {
                line: 0.85,
                hidden: Pose { fill: 0.0, ..Pose::SHOWN },
                transition: out(1200.0),
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RevealSpec {
    /// Viewport fraction the element's top must reach.
    pub line: f64,
    pub hidden: Pose,
    pub transition: TransitionSpec,
}

#[derive(Debug)]
struct Revealed {
    id: String,
    spec: RevealSpec,
    anchor: ScrollAnchor,
    pose: Pose,
    fired: bool,
    slot: TransitionSlot<Pose>,
}

/// Registered reveals, keyed by the page's element ids.
#[derive(Debug, Default)]
pub struct RevealSet {
    items: Vec<Revealed>,
}

impl RevealSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element in its hidden pose, or moves an existing one.
    pub fn register(&mut self, id: &str, kind: RevealKind, anchor: ScrollAnchor) -> Pose {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.anchor = anchor;
            return item.pose;
        }
        let spec = kind.spec();
        self.items.push(Revealed {
            id: id.to_string(),
            spec,
            anchor,
            pose: spec.hidden,
            fired: false,
            slot: TransitionSlot::new(),
        });
        spec.hidden
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pose(&self, id: &str) -> Option<Pose> {
        self.items.iter().find(|i| i.id == id).map(|i| i.pose)
    }

    pub fn is_animating(&self) -> bool {
        self.items.iter().any(|i| i.slot.is_active())
    }

    /// Fires every reveal whose line has been reached; returns their ids.
    pub fn update(&mut self, now: Time, position: ScrollPosition) -> Vec<String> {
        let mut fired = Vec::new();
        for item in &mut self.items {
            if item.fired || position.line(item.spec.line) < item.anchor.top {
                continue;
            }
            item.fired = true;
            item.slot
                .start_between(now, item.spec.transition, item.pose, Pose::SHOWN);
            fired.push(item.id.clone());
        }
        if !fired.is_empty() {
            tracing::debug!(count = fired.len(), "reveals fired");
        }
        fired
    }

    /// Advances running reveals and returns the poses that moved.
    pub fn tick(&mut self, now: Time) -> Vec<(String, Pose)> {
        let mut moved = Vec::new();
        for item in &mut self.items {
            match item.slot.tick(now) {
                None | Some(Step::Waiting) => {}
                Some(Step::Running(pose)) | Some(Step::Finished(pose)) => {
                    item.pose = pose;
                    moved.push((item.id.clone(), pose));
                }
            }
        }
        moved
    }
}
