//! Cancel-and-replace transitions.
//!
//! A [`TransitionSlot`] holds at most one running transition for one animated
//! property (the camera transform, one arc's opacity, one card's pose).
//! Starting a new transition replaces the active one; the replaced token is
//! reported so callers can observe the cancellation. Nothing is queued.

use foundation::easing::Easing;
use foundation::time::Time;

/// Identifies one started transition within its slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionToken(u64);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransitionSpec {
    pub delay_s: f64,
    pub duration_s: f64,
    pub easing: Easing,
}

impl TransitionSpec {
    pub fn millis(duration_ms: f64, easing: Easing) -> Self {
        Self {
            delay_s: 0.0,
            duration_s: (duration_ms / 1000.0).max(0.0),
            easing,
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: f64) -> Self {
        self.delay_s = (delay_ms / 1000.0).max(0.0);
        self
    }

    /// Eased progress at `elapsed_s` after start, `None` while still delayed.
    pub fn progress(&self, elapsed_s: f64) -> Option<f64> {
        if elapsed_s < self.delay_s {
            return None;
        }
        let running = elapsed_s - self.delay_s;
        let raw = if self.duration_s <= 0.0 {
            1.0
        } else {
            (running / self.duration_s).min(1.0)
        };
        Some(self.easing.apply(raw))
    }

    pub fn total_s(&self) -> f64 {
        self.delay_s + self.duration_s
    }
}

/// Values that can be tweened linearly.
pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

/// Result of sampling a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<V> {
    /// Started but still inside its delay.
    Waiting,
    Running(V),
    /// Final value; the slot is empty after a `tick` returns this.
    Finished(V),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Started {
    pub token: TransitionToken,
    pub superseded: Option<TransitionToken>,
}

struct Active<V> {
    token: TransitionToken,
    start: Time,
    spec: TransitionSpec,
    interpolate: Box<dyn Fn(f64) -> V>,
}

pub struct TransitionSlot<V> {
    active: Option<Active<V>>,
    issued: u64,
}

impl<V> Default for TransitionSlot<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for TransitionSlot<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionSlot")
            .field("active", &self.active.as_ref().map(|a| (a.token, a.start, a.spec)))
            .field("issued", &self.issued)
            .finish()
    }
}

impl<V> TransitionSlot<V> {
    pub fn new() -> Self {
        Self {
            active: None,
            issued: 0,
        }
    }

    /// Starts a transition whose value at eased progress `t` is
    /// `interpolate(t)`. Any running transition is dropped.
    pub fn start(
        &mut self,
        now: Time,
        spec: TransitionSpec,
        interpolate: impl Fn(f64) -> V + 'static,
    ) -> Started {
        self.issued += 1;
        let token = TransitionToken(self.issued);
        let superseded = self.active.take().map(|a| a.token);
        self.active = Some(Active {
            token,
            start: now,
            spec,
            interpolate: Box::new(interpolate),
        });
        Started { token, superseded }
    }

    /// Drops the running transition, leaving the property where it is.
    pub fn cancel(&mut self) -> Option<TransitionToken> {
        self.active.take().map(|a| a.token)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_token(&self) -> Option<TransitionToken> {
        self.active.as_ref().map(|a| a.token)
    }

    /// Samples without consuming a finished transition.
    pub fn sample(&self, now: Time) -> Option<Step<V>> {
        let active = self.active.as_ref()?;
        let elapsed = now.since(active.start);
        Some(match active.spec.progress(elapsed) {
            None => Step::Waiting,
            Some(_) if elapsed >= active.spec.total_s() => Step::Finished((active.interpolate)(1.0)),
            Some(t) => Step::Running((active.interpolate)(t)),
        })
    }

    /// Samples and clears the slot once the transition has finished.
    pub fn tick(&mut self, now: Time) -> Option<Step<V>> {
        let step = self.sample(now)?;
        if matches!(step, Step::Finished(_)) {
            self.active = None;
        }
        Some(step)
    }
}

impl<V: Interpolate + 'static> TransitionSlot<V> {
    /// Linear tween from `from` to `to` under `spec.easing`.
    pub fn start_between(&mut self, now: Time, spec: TransitionSpec, from: V, to: V) -> Started {
        self.start(now, spec, move |t| from.interpolate(&to, t))
    }
}

#[cfg(test)]
mod tests {
    use super::{Step, TransitionSlot, TransitionSpec};
    use foundation::easing::Easing;
    use foundation::time::Time;

    #[test]
    fn runs_from_start_to_finish_then_clears() {
        let mut slot = TransitionSlot::new();
        slot.start_between(Time(0.0), TransitionSpec::millis(1000.0, Easing::Linear), 0.0, 10.0);

        assert_eq!(slot.tick(Time(0.5)), Some(Step::Running(5.0)));
        assert_eq!(slot.tick(Time(1.0)), Some(Step::Finished(10.0)));
        assert!(!slot.is_active());
        assert_eq!(slot.tick(Time(2.0)), None);
    }

    #[test]
    fn delay_holds_before_running() {
        let mut slot = TransitionSlot::new();
        let spec = TransitionSpec::millis(500.0, Easing::Linear).with_delay_ms(90.0);
        slot.start_between(Time(0.0), spec, 0.0, 0.6);

        assert_eq!(slot.tick(Time(0.05)), Some(Step::Waiting));
        match slot.tick(Time(0.09 + 0.25)) {
            Some(Step::Running(v)) => assert!((v - 0.3).abs() < 1e-9),
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(slot.tick(Time(0.7)), Some(Step::Finished(0.6)));
    }

    #[test]
    fn new_start_supersedes_running_transition() {
        let mut slot = TransitionSlot::new();
        let spec = TransitionSpec::millis(1000.0, Easing::Linear);
        let first = slot.start_between(Time(0.0), spec, 0.0, 10.0);
        assert_eq!(first.superseded, None);

        let second = slot.start_between(Time(0.5), spec, 5.0, -5.0);
        assert_eq!(second.superseded, Some(first.token));
        assert_ne!(first.token, second.token);
        assert_eq!(slot.active_token(), Some(second.token));

        // Only the latest transition is observable.
        assert_eq!(slot.tick(Time(1.0)), Some(Step::Running(0.0)));
        assert_eq!(slot.tick(Time(1.5)), Some(Step::Finished(-5.0)));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut slot = TransitionSlot::new();
        slot.start_between(Time(3.0), TransitionSpec::millis(0.0, Easing::CubicInOut), 1.0, 2.0);
        assert_eq!(slot.tick(Time(3.0)), Some(Step::Finished(2.0)));
    }

    #[test]
    fn cancel_reports_token_and_empties_slot() {
        let mut slot: TransitionSlot<f64> = TransitionSlot::new();
        assert_eq!(slot.cancel(), None);
        let started = slot.start(Time(0.0), TransitionSpec::millis(100.0, Easing::Linear), |t| t);
        assert_eq!(slot.cancel(), Some(started.token));
        assert_eq!(slot.sample(Time(0.05)), None);
    }
}
