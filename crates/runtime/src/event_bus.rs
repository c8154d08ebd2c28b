/// A recorded event with its emission sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequenced<E> {
    pub seq: u64,
    pub event: E,
}

/// Ordered outbox of observable side effects.
///
/// Producers push events while mutating state; the owner of the bus drains
/// them afterwards in emission order. Sequence numbers keep increasing across
/// drains so consumers can detect gaps.
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Sequenced<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: E) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.events.push(Sequenced { seq, event });
    }

    pub fn events(&self) -> &[Sequenced<E>] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Sequenced<E>> {
        std::mem::take(&mut self.events)
    }

    /// Drains and drops the sequence numbers.
    pub fn drain_events(&mut self) -> Vec<E> {
        self.drain().into_iter().map(|s| s.event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_in_order() {
        let mut bus = EventBus::new();
        bus.emit("a");
        bus.emit("b");
        let seqs: Vec<_> = bus.events().iter().map(|e| (e.seq, e.event)).collect();
        assert_eq!(seqs, vec![(0, "a"), (1, "b")]);
    }

    #[test]
    fn drain_clears_events_but_keeps_sequence() {
        let mut bus = EventBus::new();
        bus.emit(1);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.is_empty());

        bus.emit(2);
        assert_eq!(bus.events()[0].seq, 1);
        assert_eq!(bus.drain_events(), vec![2]);
    }
}
