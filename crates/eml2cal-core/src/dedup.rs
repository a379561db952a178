//! Duplicate event detection within a single run.
//!
//! Two events are duplicates when their `(start, end)` pairs are exactly
//! equal; summaries and other fields are deliberately ignored, since the
//! same reservation often arrives in several emails with slightly different
//! wording.

use std::collections::HashSet;

use crate::event::Event;
use crate::time::EventTime;

type TimeKey = (Option<EventTime>, Option<EventTime>);

/// Tracks seen `(start, end)` pairs across a run.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<TimeKey>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event's time key; returns `true` if it was not seen yet.
    pub fn insert(&mut self, event: &Event) -> bool {
        self.seen.insert(event.time_key())
    }
}

/// Removes duplicate events, keeping the first occurrence in input order.
pub fn dedup_events(events: Vec<Event>) -> Vec<Event> {
    let mut dedup = Deduplicator::new();
    events
        .into_iter()
        .filter(|event| dedup.insert(event))
        .collect()
}
