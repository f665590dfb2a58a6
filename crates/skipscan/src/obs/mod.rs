//! Observability: iterator telemetry counters and sink abstractions.
//!
//! Combinators never touch the counters directly.
//! All instrumentation flows through `IteratorEvent` and `EventSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventCounters, EventOps, counters_report, counters_reset};
pub use sink::{EventSink, IteratorEvent, with_event_sink};

pub(crate) use sink::record;
