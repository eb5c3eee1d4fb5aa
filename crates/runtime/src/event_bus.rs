/// An event stamped with the frame it was emitted in.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub frame_index: u64,
    pub payload: E,
}

/// Ordered outbox of typed events.
///
/// Producers push in dispatch order; the presentation layer drains once per
/// frame and applies events in the same order.
#[derive(Debug)]
pub struct EventBus<E> {
    frame_index: u64,
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            frame_index: 0,
            events: Vec::new(),
        }
    }

    /// Stamps subsequent events with `frame_index`.
    pub fn set_frame(&mut self, frame_index: u64) {
        self.frame_index = frame_index;
    }

    pub fn emit(&mut self, payload: E) {
        self.events.push(Event {
            frame_index: self.frame_index,
            payload,
        });
    }

    pub fn extend(&mut self, payloads: impl IntoIterator<Item = E>) {
        for p in payloads {
            self.emit(p);
        }
    }

    pub fn events(&self) -> &[Event<E>] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }

    /// Drains and discards the frame stamps.
    pub fn drain_payloads(&mut self) -> Vec<E> {
        self.drain().into_iter().map(|e| e.payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        bus.set_frame(2);
        bus.emit("hello");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
    }

    #[test]
    fn drain_clears_events_and_keeps_order() {
        let mut bus = EventBus::new();
        bus.extend(["a", "b", "c"]);
        let drained = bus.drain_payloads();
        assert_eq!(drained, vec!["a", "b", "c"]);
        assert!(bus.events().is_empty());
    }
}
