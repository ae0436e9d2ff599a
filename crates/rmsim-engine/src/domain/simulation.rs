//! Simulation - context, row loop and lifecycle
//!
//! # Ownership Model
//!
//! ```text
//! Simulator
//!   ├─ schedule: Schedule              (immutable input)
//!   ├─ context: SimulationContext      (all mutable state)
//!   │   ├─ ledger: ResourceLedger
//!   │   ├─ registry: TaskRegistry
//!   │   ├─ clock: LogicalClock
//!   │   └─ trace: EventTrace
//!   ├─ dispatcher: StepDispatcher      (stateless)
//!   └─ resolver: DeadlockResolver      (stateless)
//! ```
//!
//! Every piece of run state lives in the context, so one `reset` returns
//! the simulator to its initial state and back-to-back runs of the same
//! schedule produce identical reports.

use tracing::{debug, info};

use super::clock::{Cycle, LogicalClock};
use super::deadlock::{DeadlockResolver, Resolution};
use super::dispatch::{RowOutcome, RowPass, StepDispatcher};
use super::error::SimulationResult;
use super::manager::ManagerKind;
use super::report::RunReport;
use super::resources::ResourceLedger;
use super::schedule::Schedule;
use super::tasks::TaskRegistry;
use super::trace::EventTrace;

/// All mutable state of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationContext {
    pub(crate) ledger: ResourceLedger,
    pub(crate) registry: TaskRegistry,
    pub(crate) clock: LogicalClock,
    pub(crate) trace: EventTrace,
    pub(crate) deadlocks_resolved: usize,
}

impl SimulationContext {
    /// Fresh state sized for `schedule`
    pub fn new(schedule: &Schedule, trace: EventTrace) -> Self {
        Self {
            ledger: ResourceLedger::new(schedule.capacities(), schedule.task_count()),
            registry: TaskRegistry::new(schedule.task_count()),
            clock: LogicalClock::new(),
            trace,
            deadlocks_resolved: 0,
        }
    }

    /// Resource ledger
    pub const fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// Task registry
    pub const fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Logical clock
    pub const fn clock(&self) -> &LogicalClock {
        &self.clock
    }

    /// Event trace
    pub const fn trace(&self) -> &EventTrace {
        &self.trace
    }

    /// Number of rows whose deadlock had to be broken
    pub const fn deadlocks_resolved(&self) -> usize {
        self.deadlocks_resolved
    }

    /// Restore the initial state: full pools, fresh tasks, cycle zero
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.registry.reset();
        self.clock.reset();
        self.trace.clear();
        self.deadlocks_resolved = 0;
    }
}

/// Everything that happened in one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSummary {
    /// Row index
    pub row: usize,
    /// Clock when the row started
    pub started_at: Cycle,
    /// Primary-pass outcomes in group order
    pub outcomes: Vec<RowOutcome>,
    /// Deadlock recovery performed after the primary pass
    pub resolution: Resolution,
}

/// Top-level simulation controller
///
/// # Example
/// ```rust
/// use rmsim_engine::domain::{ScheduleBuilder, Simulator};
/// use rmsim_engine::{ResourceId, TaskId};
///
/// let r0 = ResourceId::new(0);
/// let schedule = ScheduleBuilder::new(1, vec![1])
///     .group(TaskId::new(0), |g| g.initiate(r0, 1).request(r0, 1).terminate())
///     .build();
///
/// let mut sim = Simulator::new(schedule).unwrap();
/// let report = sim.run().unwrap();
/// assert_eq!(report.tasks[0].turnaround, Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    schedule: Schedule,
    manager: ManagerKind,
    context: SimulationContext,
    dispatcher: StepDispatcher,
    resolver: DeadlockResolver,
    next_row: usize,
}

impl Simulator {
    /// Opportunistic simulator without tracing
    ///
    /// # Errors
    /// Fails if the schedule references unknown tasks or resources.
    pub fn new(schedule: Schedule) -> SimulationResult<Self> {
        Self::with_parts(schedule, ManagerKind::default(), EventTrace::disabled())
    }

    pub(crate) fn with_parts(
        schedule: Schedule,
        manager: ManagerKind,
        trace: EventTrace,
    ) -> SimulationResult<Self> {
        schedule.validate()?;
        let context = SimulationContext::new(&schedule, trace);
        Ok(Self {
            schedule,
            manager,
            context,
            dispatcher: StepDispatcher::new(),
            resolver: DeadlockResolver::new(),
            next_row: 0,
        })
    }

    /// Input schedule
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Simulated manager
    pub const fn manager(&self) -> ManagerKind {
        self.manager
    }

    /// Current state
    pub const fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// Next row to process
    pub const fn next_row(&self) -> usize {
        self.next_row
    }

    /// True once every row has been processed
    pub fn is_finished(&self) -> bool {
        self.next_row >= self.schedule.max_group_len()
    }

    /// Process one row: primary pass, deadlock recovery, then one tick
    ///
    /// # Returns
    /// `None` once every row has been processed
    pub fn step(&mut self) -> SimulationResult<Option<RowSummary>> {
        if self.is_finished() {
            return Ok(None);
        }

        let row = self.next_row;
        let started_at = self.context.clock.now();

        let (outcomes, resolution) = match self.manager {
            ManagerKind::Opportunistic => {
                let outcomes = self.dispatcher.dispatch_row(
                    &mut self.context,
                    &self.schedule,
                    row,
                    RowPass::Primary,
                )?;
                let resolution = self.resolver.resolve(
                    &self.dispatcher,
                    &mut self.context,
                    &self.schedule,
                    row,
                )?;
                (outcomes, resolution)
            }
        };

        self.context.clock.tick();
        self.next_row += 1;
        debug_assert!(self.context.ledger.is_conserved());

        debug!(
            row,
            cycle = self.context.clock.now(),
            alive = self.context.registry.alive_count(),
            "row complete"
        );

        Ok(Some(RowSummary {
            row,
            started_at,
            outcomes,
            resolution,
        }))
    }

    /// Run every remaining row and build the report
    pub fn run(&mut self) -> SimulationResult<RunReport> {
        while self.step()?.is_some() {}

        let report = self.report();
        info!(
            manager = %self.manager,
            tasks = report.tasks.len(),
            aborted = report.aborted_tasks,
            deadlocks = report.deadlocks_resolved,
            cycles = report.final_cycle,
            "simulation finished"
        );
        Ok(report)
    }

    /// Report for the current state
    pub fn report(&self) -> RunReport {
        RunReport::from_context(self.manager, &self.context)
    }

    /// Return to the initial state so the schedule can be run again
    pub fn reset(&mut self) {
        self.context.reset();
        self.next_row = 0;
    }
}
