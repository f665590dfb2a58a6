//! Event sink boundary.
//!
//! Combinators MUST NOT depend on obs::metrics directly.
//! This module is the only bridge between iteration logic and the
//! thread-local counters.

use crate::{config, error::ErrorOrigin, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn EventSink>>> = RefCell::new(None);
}

///
/// IteratorEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IteratorEvent {
    /// A `forward` call re-positioned the upstream cursor.
    Forwarded { origin: ErrorOrigin },
    /// A `forward` call was absorbed because the head already satisfied it.
    ForwardSkipped { origin: ErrorOrigin },
    Recycled { origin: ErrorOrigin },
    Exhausted { origin: ErrorOrigin },
    DuplicateSuppressed { origin: ErrorOrigin },
    /// Intersection moved to a new candidate value.
    CandidateProposed { origin: ErrorOrigin },
    /// A finaliser ran from `Drop` rather than an explicit `recycle`.
    FinaliserOnDrop { origin: ErrorOrigin },
}

impl IteratorEvent {
    #[must_use]
    pub const fn origin(self) -> ErrorOrigin {
        match self {
            Self::Forwarded { origin }
            | Self::ForwardSkipped { origin }
            | Self::Recycled { origin }
            | Self::Exhausted { origin }
            | Self::DuplicateSuppressed { origin }
            | Self::CandidateProposed { origin }
            | Self::FinaliserOnDrop { origin } => origin,
        }
    }
}

///
/// EventSink
///

pub trait EventSink {
    fn record(&self, event: IteratorEvent);
}

/// CounterSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct CounterSink;

impl EventSink for CounterSink {
    fn record(&self, event: IteratorEvent) {
        let origin = event.origin();
        match event {
            IteratorEvent::Forwarded { .. } => {
                metrics::bump(origin, |m| m.forwards = m.forwards.saturating_add(1));
            }
            IteratorEvent::ForwardSkipped { .. } => {
                metrics::bump(origin, |m| {
                    m.forwards_skipped = m.forwards_skipped.saturating_add(1);
                });
            }
            IteratorEvent::Recycled { .. } => {
                metrics::bump(origin, |m| m.recycles = m.recycles.saturating_add(1));
            }
            IteratorEvent::Exhausted { .. } => {
                metrics::bump(origin, |m| m.exhaustions = m.exhaustions.saturating_add(1));
            }
            IteratorEvent::DuplicateSuppressed { .. } => {
                metrics::bump(origin, |m| {
                    m.duplicates_suppressed = m.duplicates_suppressed.saturating_add(1);
                });
            }
            IteratorEvent::CandidateProposed { .. } => {
                metrics::bump(origin, |m| {
                    m.candidates_proposed = m.candidates_proposed.saturating_add(1);
                });
            }
            IteratorEvent::FinaliserOnDrop { .. } => {
                metrics::bump(origin, |m| {
                    m.finalisers_on_drop = m.finalisers_on_drop.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) fn record(event: IteratorEvent) {
    if !config::current().metrics {
        return;
    }

    let installed = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match installed {
        Some(sink) => sink.record(event),
        None => CounterSink.record(event),
    }
}

/// Run a closure with a temporary event sink override.
pub fn with_event_sink<R>(sink: Rc<dyn EventSink>, f: impl FnOnce() -> R) -> R {
    struct Guard(Option<Rc<dyn EventSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let previous = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = previous;
            });
        }
    }

    let previous = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(previous);

    f()
}
