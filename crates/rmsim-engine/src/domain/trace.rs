//! Event Trace
//!
//! Optional, bounded record of every dispatch and every deadlock action in
//! a run. Disabled traces cost a branch per event and allocate nothing.
//! Once `max_events` is reached further events are counted, not stored.

use serde::Serialize;
use tracing::warn;

use super::clock::Cycle;
use super::dispatch::{DispatchOutcome, RowPass};
use super::schedule::ActivityKind;
use super::tasks::TaskId;

/// Maximum events per trace (default)
pub const DEFAULT_MAX_EVENTS: usize = 100_000;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceKind {
    /// An activity was dispatched
    Dispatch {
        /// Primary or replay pass
        pass: RowPass,
        /// Activity id
        activity: usize,
        /// Activity as scheduled
        kind: ActivityKind,
        /// Result of the dispatch
        outcome: DispatchOutcome,
    },
    /// A task was aborted to break a deadlock
    Abort {
        /// Units returned to the free pools
        reclaimed: u64,
    },
    /// A replay left the system deadlocked and its tick was taken back
    Rollback,
}

/// One trace record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// Clock value when the event happened
    pub cycle: Cycle,
    /// Row being processed
    pub row: usize,
    /// Task concerned (the victim for aborts, the row's last victim for rollbacks)
    pub task: TaskId,
    /// Event payload
    #[serde(flatten)]
    pub kind: TraceKind,
}

/// Bounded event buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTrace {
    enabled: bool,
    max_events: usize,
    events: Vec<TraceEvent>,
    dropped: usize,
}

impl EventTrace {
    /// Trace that records nothing
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            max_events: 0,
            events: Vec::new(),
            dropped: 0,
        }
    }

    /// Enabled trace keeping at most `max_events`
    pub const fn with_capacity(max_events: usize) -> Self {
        Self {
            enabled: true,
            max_events,
            events: Vec::new(),
            dropped: 0,
        }
    }

    /// Whether events are being recorded
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Configured limit
    pub const fn max_events(&self) -> usize {
        self.max_events
    }

    /// Append an event, or count it as dropped once the buffer is full
    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if !self.enabled {
            return;
        }
        if self.events.len() >= self.max_events {
            if self.dropped == 0 {
                warn!(
                    max_events = self.max_events,
                    "trace buffer full, dropping further events"
                );
            }
            self.dropped += 1;
            return;
        }
        self.events.push(event);
    }

    /// Recorded events in order
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Number of recorded events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Events that did not fit
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Forget all events, keeping the configuration
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }
}
