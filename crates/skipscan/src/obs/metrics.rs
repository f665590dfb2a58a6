use crate::error::ErrorOrigin;
use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventCounters
/// Ephemeral, in-memory iterator counters for the current thread.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventCounters {
    pub totals: EventOps,
    pub origins: BTreeMap<String, EventOps>,
}

impl EventCounters {
    /// Counters recorded for one combinator kind, zeroed when absent.
    #[must_use]
    pub fn origin(&self, origin: ErrorOrigin) -> EventOps {
        self.origins
            .get(&origin.to_string())
            .copied()
            .unwrap_or_default()
    }
}

///
/// EventOps
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Seeking
    pub forwards: u64,
    pub forwards_skipped: u64,

    // Lifecycle
    pub recycles: u64,
    pub exhaustions: u64,
    pub finalisers_on_drop: u64,

    // Combinator work
    pub duplicates_suppressed: u64,
    pub candidates_proposed: u64,
}

thread_local! {
    static COUNTERS: RefCell<EventCounters> = RefCell::new(EventCounters::default());
}

/// Borrow counters mutably.
pub(crate) fn with_counters_mut<R>(f: impl FnOnce(&mut EventCounters) -> R) -> R {
    COUNTERS.with(|c| f(&mut c.borrow_mut()))
}

/// Apply one update to the totals and to the per-origin entry.
pub(crate) fn bump(origin: ErrorOrigin, update: impl Fn(&mut EventOps)) {
    with_counters_mut(|c| {
        update(&mut c.totals);
        update(c.origins.entry(origin.to_string()).or_default());
    });
}

/// Snapshot the counters for this thread.
#[must_use]
pub fn counters_report() -> EventCounters {
    COUNTERS.with(|c| c.borrow().clone())
}

/// Reset all counters (useful in tests).
pub fn counters_reset() {
    with_counters_mut(|c| *c = EventCounters::default());
}
