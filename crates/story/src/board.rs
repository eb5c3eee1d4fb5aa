use foundation::time::Time;
use runtime::{ScrollAnchor, ScrollPosition};

use crate::counter::StatCounter;
use crate::reveal::{Pose, RevealKind, RevealSet};
use crate::scrub::{HeroFrame, progress_width, section_offset};

/// Viewport line a stat counter's top must reach.
const COUNTER_LINE: f64 = 0.85;

/// Updates for the page to apply, keyed by element id.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryEvent {
    Pose { id: String, pose: Pose },
    CounterText { id: String, text: String },
    ProgressWidth(f64),
    Hero(HeroFrame),
    SectionOffset { id: String, y: f64 },
}

#[derive(Debug)]
struct CounterEntry {
    id: String,
    anchor: ScrollAnchor,
    counter: StatCounter,
}

/// Every scroll effect on the page.
#[derive(Debug, Default)]
pub struct StoryBoard {
    reveals: RevealSet,
    counters: Vec<CounterEntry>,
    hero: Option<ScrollAnchor>,
    sections: Vec<(String, ScrollAnchor)>,
    document_height: f64,
}

impl StoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_document_height(&mut self, height: f64) {
        self.document_height = height.max(0.0);
    }

    pub fn set_hero(&mut self, anchor: ScrollAnchor) {
        self.hero = Some(anchor);
    }

    /// Returns the element's starting pose.
    pub fn register_reveal(&mut self, id: &str, kind: RevealKind, anchor: ScrollAnchor) -> Pose {
        self.reveals.register(id, kind, anchor)
    }

    /// Returns the counter's starting text.
    pub fn register_counter(&mut self, id: &str, target: u64, anchor: ScrollAnchor) -> String {
        if let Some(entry) = self.counters.iter_mut().find(|c| c.id == id) {
            entry.anchor = anchor;
            return entry.counter.text();
        }
        let counter = StatCounter::new(target);
        let text = counter.text();
        self.counters.push(CounterEntry {
            id: id.to_string(),
            anchor,
            counter,
        });
        text
    }

    pub fn register_section(&mut self, id: &str, anchor: ScrollAnchor) {
        match self.sections.iter_mut().find(|(s, _)| s == id) {
            Some((_, a)) => *a = anchor,
            None => self.sections.push((id.to_string(), anchor)),
        }
    }

    pub fn reveals(&self) -> &RevealSet {
        &self.reveals
    }

    pub fn is_animating(&self) -> bool {
        self.reveals.is_animating() || self.counters.iter().any(|c| c.counter.is_running())
    }

    /// Scrubbed values for the new position; starts reveals and counters
    /// whose lines were reached.
    pub fn on_scroll(&mut self, now: Time, position: ScrollPosition) -> Vec<StoryEvent> {
        let mut events = vec![StoryEvent::ProgressWidth(progress_width(
            position,
            self.document_height,
        ))];
        if let Some(hero) = self.hero {
            events.push(StoryEvent::Hero(HeroFrame::at(hero, position)));
        }
        events.extend(self.sections.iter().map(|(id, anchor)| StoryEvent::SectionOffset {
            id: id.clone(),
            y: section_offset(*anchor, position),
        }));

        self.reveals.update(now, position);
        let line = position.line(COUNTER_LINE);
        for entry in &mut self.counters {
            if line >= entry.anchor.top && entry.counter.start(now) {
                tracing::debug!(id = %entry.id, target = entry.counter.target(), "counter started");
            }
        }
        events
    }

    /// Advances running reveals and counters.
    pub fn tick(&mut self, now: Time) -> Vec<StoryEvent> {
        let mut events: Vec<StoryEvent> = self
            .reveals
            .tick(now)
            .into_iter()
            .map(|(id, pose)| StoryEvent::Pose { id, pose })
            .collect();
        for entry in &mut self.counters {
            if let Some(text) = entry.counter.tick(now) {
                events.push(StoryEvent::CounterText {
                    id: entry.id.clone(),
                    text,
                });
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::{StoryBoard, StoryEvent};
    use crate::reveal::{Pose, RevealKind};
    use foundation::time::Time;
    use pretty_assertions::assert_eq;
    use runtime::{ScrollAnchor, ScrollPosition};

    const VH: f64 = 1000.0;

    fn board() -> StoryBoard {
        let mut board = StoryBoard::new();
        board.set_document_height(5000.0);
        board.register_reveal("card", RevealKind::GlassCard, ScrollAnchor::new(1500.0, 300.0));
        board.register_counter("routes", 58000, ScrollAnchor::new(1500.0, 60.0));
        board
    }

    #[test]
    fn scroll_reports_scrubbed_values() {
        let mut board = board();
        board.register_section("usa", ScrollAnchor::new(3000.0, 1000.0));
        let events = board.on_scroll(Time::ZERO, ScrollPosition::new(0.0, VH));
        assert_eq!(
            events,
            vec![
                StoryEvent::ProgressWidth(0.0),
                StoryEvent::SectionOffset { id: "usa".to_string(), y: 0.0 },
            ]
        );
    }

    #[test]
    fn counters_and_reveals_start_at_their_lines() {
        let mut board = board();
        board.on_scroll(Time::ZERO, ScrollPosition::new(0.0, VH));
        assert!(board.tick(Time(0.5)).is_empty());
        assert!(!board.is_animating());

        board.on_scroll(Time(1.0), ScrollPosition::new(700.0, VH));
        assert!(board.is_animating());

        let events = board.tick(Time(5.0));
        assert_eq!(
            events,
            vec![
                StoryEvent::Pose { id: "card".to_string(), pose: Pose::SHOWN },
                StoryEvent::CounterText { id: "routes".to_string(), text: "58,000".to_string() },
            ]
        );
        assert!(!board.is_animating());
    }

    #[test]
    fn counters_register_once() {
        let mut board = board();
        assert_eq!(board.register_counter("routes", 1, ScrollAnchor::new(0.0, 10.0)), "0");
        board.on_scroll(Time::ZERO, ScrollPosition::new(0.0, VH));
        // Moved to the top of the page and kept its first target.
        let events = board.tick(Time(3.0));
        assert_eq!(
            events,
            vec![StoryEvent::CounterText { id: "routes".to_string(), text: "58,000".to_string() }]
        );
    }
}
