//! Time-bounded event selection.
//!
//! Events carry multipliers the evaluator and reward calculator consult. When
//! windows overlap, the most recently started event wins; a tie on start time
//! falls back to the greatest id, so selection is deterministic.

use chrono::{DateTime, Utc};

use crate::types::LiveEvent;

pub trait EventCalendar: Send + Sync {
    fn list(&self) -> Vec<LiveEvent>;
}

/// Fixed event list, good enough for hosts without a CMS-backed calendar and
/// for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    events: Vec<LiveEvent>,
}

impl StaticCalendar {
    pub fn new(events: Vec<LiveEvent>) -> Self {
        Self { events }
    }
}

impl EventCalendar for StaticCalendar {
    fn list(&self) -> Vec<LiveEvent> {
        self.events.clone()
    }
}

/// The event active at `now`, if any. Windows are half-open: an event is
/// active from `starts_at` inclusive to `ends_at` exclusive.
pub fn active_event(events: &[LiveEvent], now: DateTime<Utc>) -> Option<LiveEvent> {
    events
        .iter()
        .filter(|event| event.starts_at <= now && now < event.ends_at)
        .max_by(|a, b| {
            a.starts_at
                .cmp(&b.starts_at)
                .then_with(|| a.id.cmp(&b.id))
        })
        .cloned()
}
