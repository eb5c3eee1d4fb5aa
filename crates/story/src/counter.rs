//! Stat counters that count up once when they scroll into view.

use foundation::easing::Easing;
use foundation::text::group_thousands;
use foundation::time::Time;
use runtime::{Step, TransitionSlot, TransitionSpec};

pub const COUNTER_DURATION_MS: f64 = 2000.0;

/// Targets at or above this get thousands separators.
pub const GROUPING_THRESHOLD: u64 = 1000;

/// Formats a counter value the way its target is formatted.
pub fn counter_text(value: u64, target: u64) -> String {
    if target >= GROUPING_THRESHOLD {
        group_thousands(value)
    } else {
        value.to_string()
    }
}

#[derive(Debug)]
pub struct StatCounter {
    target: u64,
    value: u64,
    started: bool,
    slot: TransitionSlot<u64>,
}

impl StatCounter {
    pub fn new(target: u64) -> Self {
        Self {
            target,
            value: 0,
            started: false,
            slot: TransitionSlot::new(),
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn text(&self) -> String {
        counter_text(self.value, self.target)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_active()
    }

    /// Starts counting from 0. Later calls do nothing and return `false`.
    pub fn start(&mut self, now: Time) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        let target = self.target as f64;
        self.slot.start(
            now,
            TransitionSpec::millis(COUNTER_DURATION_MS, Easing::CubicOut),
            move |t| (target * t).round() as u64,
        );
        true
    }

    /// Advances the count; returns the new text when the value changed or the
    /// count just finished.
    pub fn tick(&mut self, now: Time) -> Option<String> {
        match self.slot.tick(now)? {
            Step::Waiting => None,
            Step::Running(value) => {
                if value == self.value {
                    return None;
                }
                self.value = value;
                Some(self.text())
            }
            Step::Finished(_) => {
                self.value = self.target;
                Some(self.text())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StatCounter, counter_text};
    use foundation::time::Time;
    use pretty_assertions::assert_eq;

    #[test]
    fn grouping_follows_the_target() {
        assert_eq!(counter_text(999, 999), "999");
        assert_eq!(counter_text(999, 1000), "999");
        assert_eq!(counter_text(1000, 1000), "1,000");
        assert_eq!(counter_text(52340, 58000), "52,340");
    }

    #[test]
    fn counts_up_with_ease_out_and_lands_exactly() {
        let mut counter = StatCounter::new(58000);
        assert_eq!(counter.text(), "0");
        assert!(counter.start(Time(10.0)));

        // Halfway through, ease-out cubic is at 0.875.
        assert_eq!(counter.tick(Time(11.0)), Some("50,750".to_string()));
        assert_eq!(counter.value(), 50750);

        assert_eq!(counter.tick(Time(12.0)), Some("58,000".to_string()));
        assert!(!counter.is_running());
        assert_eq!(counter.tick(Time(13.0)), None);
        assert_eq!(counter.value(), 58000);
    }

    #[test]
    fn small_targets_are_plain_integers() {
        let mut counter = StatCounter::new(87);
        counter.start(Time::ZERO);
        // 87 * 0.875 = 76.125
        assert_eq!(counter.tick(Time(1.0)), Some("76".to_string()));
        assert_eq!(counter.tick(Time(5.0)), Some("87".to_string()));
    }

    #[test]
    fn starts_only_once() {
        let mut counter = StatCounter::new(100);
        assert!(counter.start(Time::ZERO));
        counter.tick(Time(3.0));
        assert!(!counter.start(Time(4.0)));
        assert!(!counter.is_running());
        assert_eq!(counter.value(), 100);
    }

    #[test]
    fn unchanged_values_are_not_reported() {
        let mut counter = StatCounter::new(1);
        counter.start(Time::ZERO);
        // 1 * eased(0.01) rounds to 0, same as the initial value.
        assert_eq!(counter.tick(Time(0.02)), None);
    }
}
