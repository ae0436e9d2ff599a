//! Domain Layer - the resource-manager engine
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  Schedule Module               Resources Module             │
//! │  ├─ Schedule                   ├─ ResourceLedger            │
//! │  ├─ ActivityGroup / Activity   └─ ResourcePool              │
//! │  └─ ScheduleBuilder                                         │
//! │                                                             │
//! │  Tasks Module                  Clock Module                 │
//! │  ├─ TaskRegistry               └─ LogicalClock              │
//! │  └─ Task / TaskStatus                                       │
//! │                                                             │
//! │                   Simulation Module                         │
//! │                   ├─ Simulator                              │
//! │                   ├─ StepDispatcher                         │
//! │                   ├─ DeadlockResolver                       │
//! │                   └─ RunReport                              │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Building a simulator
//!
//! ```rust
//! use rmsim_engine::domain::{ScheduleBuilder, SimulatorBuilder};
//! use rmsim_engine::{ResourceId, TaskId};
//!
//! let r0 = ResourceId::new(0);
//! let schedule = ScheduleBuilder::new(1, vec![1])
//!     .group(TaskId::new(0), |g| g.initiate(r0, 1).request(r0, 1).release(r0, 1).terminate())
//!     .build();
//!
//! let mut sim = SimulatorBuilder::new(schedule)
//!     .enable_tracing(true)
//!     .max_traced_events(1_000)
//!     .build()
//!     .unwrap();
//!
//! sim.run().unwrap();
//! assert_eq!(sim.context().trace().event_count(), 4);
//! ```

pub mod clock;
pub mod deadlock;
pub mod dispatch;
pub mod error;
pub mod manager;
pub mod report;
pub mod resources;
pub mod schedule;
pub mod simulation;
pub mod tasks;
pub mod trace;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-exports
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use clock::{Cycle, LogicalClock};
pub use deadlock::{DeadlockDetector, DeadlockResolver, Resolution};
pub use dispatch::{DispatchOutcome, RowOutcome, RowPass, StepDispatcher};
pub use error::{SimulationError, SimulationResult};
pub use manager::{ManagerKind, UnknownManager};
pub use report::{RunReport, TaskSummary};
pub use resources::{LedgerError, RequestResult, ResourceId, ResourceLedger, ResourcePool, Units};
pub use schedule::{Activity, ActivityGroup, ActivityKind, GroupBuilder, Schedule, ScheduleBuilder};
pub use simulation::{RowSummary, SimulationContext, Simulator};
pub use tasks::{Task, TaskId, TaskRegistry, TaskStatus};
pub use trace::{EventTrace, TraceEvent, TraceKind};

/// Builder for configured simulators
///
/// # Defaults
/// - Opportunistic (FIFO) manager
/// - Tracing disabled
/// - Max 100,000 traced events
#[derive(Debug, Clone)]
pub struct SimulatorBuilder {
    schedule: Schedule,
    manager: ManagerKind,
    enable_tracing: bool,
    max_traced_events: usize,
}

impl SimulatorBuilder {
    /// Create new builder for `schedule` with default configuration
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            manager: ManagerKind::default(),
            enable_tracing: false,
            max_traced_events: trace::DEFAULT_MAX_EVENTS,
        }
    }

    /// Select the resource manager
    #[must_use]
    pub const fn manager(mut self, manager: ManagerKind) -> Self {
        self.manager = manager;
        self
    }

    /// Enable or disable event tracing
    ///
    /// When enabled, every dispatch, abort and rollback is recorded in
    /// the context's [`EventTrace`].
    #[must_use]
    pub const fn enable_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = enable;
        self
    }

    /// Set maximum number of events to trace
    #[must_use]
    pub const fn max_traced_events(mut self, max_events: usize) -> Self {
        self.max_traced_events = max_events;
        self
    }

    /// Validate the schedule and assemble the simulator
    ///
    /// # Errors
    /// Fails if the schedule references unknown tasks or resources.
    pub fn build(self) -> SimulationResult<Simulator> {
        let trace = if self.enable_tracing {
            EventTrace::with_capacity(self.max_traced_events)
        } else {
            EventTrace::disabled()
        };
        Simulator::with_parts(self.schedule, self.manager, trace)
    }
}
