//! Scroll-anchored scenes.
//!
//! A scene is active while the viewport's center line lies inside its anchor
//! element. Crossing into a scene, scrolling down or back up, fires it; the
//! caller maps the fired name to an action. A jump between two updates fires
//! every scene whose edge the line swept past, so the last one wins.

use runtime::{ScrollAnchor, ScrollPosition};

/// Fraction of the viewport height where the trigger line sits.
const TRIGGER_LINE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
struct SceneState {
    name: String,
    anchor: ScrollAnchor,
    inside: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SceneTrigger {
    scenes: Vec<SceneState>,
    last_line: Option<f64>,
}

impl SceneTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or moves a scene. Scenes are kept in document order.
    pub fn register(&mut self, name: &str, anchor: ScrollAnchor) {
        match self.scenes.iter_mut().find(|s| s.name == name) {
            Some(scene) => scene.anchor = anchor,
            None => self.scenes.push(SceneState {
                name: name.to_string(),
                anchor,
                inside: false,
            }),
        }
        self.scenes
            .sort_by(|a, b| a.anchor.top.total_cmp(&b.anchor.top));
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// First scene (in document order) containing the trigger line.
    pub fn active(&self) -> Option<&str> {
        self.scenes
            .iter()
            .find(|s| s.inside)
            .map(|s| s.name.as_str())
    }

    /// Updates scene states for a new scroll position and returns the scenes
    /// entered since the last update, in traversal order.
    ///
    /// Scrolling down enters a scene when the line crosses its top; scrolling
    /// up enters it when the line crosses its bottom.
    pub fn update(&mut self, position: ScrollPosition) -> Vec<String> {
        let line = position.line(TRIGGER_LINE);
        let last = self.last_line.replace(line);
        let backwards = last.is_some_and(|last| line < last);

        let mut entered = Vec::new();
        for scene in &mut self.scenes {
            let (top, bottom) = (scene.anchor.top, scene.anchor.bottom());
            let inside = line >= top && line < bottom;
            let crossed = match last {
                Some(last) if line > last => last < top && top <= line,
                Some(last) if line < last => line < bottom && bottom <= last,
                _ => false,
            };
            if crossed || (inside && !scene.inside) {
                entered.push(scene.name.clone());
            }
            scene.inside = inside;
        }
        if backwards {
            entered.reverse();
        }
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::SceneTrigger;
    use runtime::{ScrollAnchor, ScrollPosition};
    use pretty_assertions::assert_eq;

    fn trigger() -> SceneTrigger {
        let mut t = SceneTrigger::new();
        // Registered out of order on purpose.
        t.register("europe", ScrollAnchor::new(2000.0, 1000.0));
        t.register("global", ScrollAnchor::new(0.0, 1000.0));
        t.register("usa", ScrollAnchor::new(1000.0, 1000.0));
        t
    }

    fn at(scroll_y: f64) -> ScrollPosition {
        // Trigger line is 400px below the scroll offset.
        ScrollPosition::new(scroll_y, 800.0)
    }

    #[test]
    fn fires_on_entry_in_both_directions() {
        let mut t = trigger();
        assert_eq!(t.update(at(0.0)), vec!["global"]);
        assert_eq!(t.update(at(100.0)), Vec::<String>::new());
        assert_eq!(t.update(at(700.0)), vec!["usa"]);
        assert_eq!(t.active(), Some("usa"));
        // Back up into global.
        assert_eq!(t.update(at(500.0)), vec!["global"]);
        // And down again: oscillation refires.
        assert_eq!(t.update(at(650.0)), vec!["usa"]);
    }

    #[test]
    fn jumps_fire_every_crossed_scene() {
        let mut t = trigger();
        t.update(at(0.0));
        // Jump from global straight into europe, over usa.
        assert_eq!(t.update(at(1700.0)), vec!["usa", "europe"]);
        assert_eq!(t.update(at(5000.0)), Vec::<String>::new());
        assert_eq!(t.active(), None);
    }

    #[test]
    fn jump_back_to_the_top_ends_on_global() {
        let mut t = SceneTrigger::new();
        t.register("global", ScrollAnchor::new(1000.0, 1000.0));
        t.register("usa", ScrollAnchor::new(2000.0, 1000.0));
        t.register("europe", ScrollAnchor::new(3000.0, 1000.0));

        assert_eq!(t.update(at(3000.0)), vec!["europe"]);
        // Above every scene: usa and global are crossed on the way up.
        assert_eq!(t.update(at(0.0)), vec!["usa", "global"]);
        assert_eq!(t.active(), None);
        // Below every scene: all three are crossed on the way down.
        assert_eq!(t.update(at(9000.0)), vec!["global", "usa", "europe"]);
        assert_eq!(t.active(), None);
    }

    #[test]
    fn re_registering_moves_a_scene() {
        let mut t = trigger();
        t.register("global", ScrollAnchor::new(3000.0, 500.0));
        assert_eq!(t.len(), 3);
        assert_eq!(t.update(at(2700.0)), vec!["global"]);
    }
}
