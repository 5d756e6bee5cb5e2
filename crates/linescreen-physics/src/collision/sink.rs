//! Per-step event accumulation.
//!
//! The sink is a monoid: `EventSink::new()` is the identity and
//! [`EventSink::concat`] the associative merge (ordered concatenation of
//! events, integer addition of counters). Parallel queries give every
//! worker a private sink and merge the views at the join, so the final
//! count is independent of worker count; event *order* across workers is
//! unspecified until [`EventSink::sort_events`] is applied.

use super::IntersectionEvent;
use serde::Serialize;

/// Append-only sequence of intersection events plus a collision counter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventSink {
    events: Vec<IntersectionEvent>,
    collisions: u64,
}

impl EventSink {
    /// Creates an empty sink (the reducer identity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event and bumps the collision counter.
    pub fn push(&mut self, event: IntersectionEvent) {
        self.events.push(event);
        self.collisions += 1;
    }

    /// Number of accumulated events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when no events were accumulated.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total collisions counted.
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// The accumulated events in append order.
    pub fn events(&self) -> &[IntersectionEvent] {
        &self.events
    }

    /// Merges another sink into this one (ordered concatenation plus
    /// counter addition). Associative; used as the rayon reducer.
    pub fn concat(mut self, mut other: EventSink) -> EventSink {
        self.events.append(&mut other.events);
        self.collisions += other.collisions;
        self
    }

    /// Sorts events by `(min id, max id)` for a deterministic order.
    pub fn sort_events(&mut self) {
        self.events.sort_unstable_by_key(IntersectionEvent::sort_key);
    }

    /// Empties the sink, handing the events to the resolver.
    pub fn drain(&mut self) -> Vec<IntersectionEvent> {
        std::mem::take(&mut self.events)
    }
}
