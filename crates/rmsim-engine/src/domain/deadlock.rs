//! Deadlock detection and abort-and-replay recovery
//!
//! # Detection
//!
//! The system is deadlocked when at least one task is alive and every alive
//! task is blocked. No wait-for graph is needed: a blocked task only ever
//! waits for units that alive tasks hold.
//!
//! # Recovery
//!
//! ```text
//! while deadlocked:
//!     abort lowest-numbered blocked task, reclaim its holdings
//!     clock += 1                       (provisional)
//!     replay the row for live groups
//!     if still deadlocked:
//!         clock -= 1
//!         take back the wait cycle the replay charged (once per task)
//! ```
//!
//! Each iteration removes one alive task, so the loop runs at most once per
//! task.

use tracing::{info, warn};

use super::dispatch::{DispatchOutcome, RowPass, StepDispatcher};
use super::error::SimulationResult;
use super::schedule::Schedule;
use super::simulation::SimulationContext;
use super::tasks::{Task, TaskId, TaskRegistry, TaskStatus};
use super::trace::{TraceEvent, TraceKind};

/// Pure predicates over the task registry
pub struct DeadlockDetector;

impl DeadlockDetector {
    /// At least one alive task, and all of them blocked
    pub fn is_deadlocked(registry: &TaskRegistry) -> bool {
        let alive = registry.alive_count();
        alive > 0 && registry.blocked_count() == alive
    }

    /// Lowest-numbered blocked task
    pub fn select_victim(registry: &TaskRegistry) -> Option<TaskId> {
        registry
            .iter()
            .find(|task| task.status() == TaskStatus::Blocked)
            .map(Task::id)
    }
}

/// What the recovery loop did for one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Aborted tasks, in abort order
    pub victims: Vec<TaskId>,
    /// Replays that left the system deadlocked
    pub rollbacks: usize,
    /// Tasks whose replay wait cycle was taken back
    pub corrected: Vec<TaskId>,
}

impl Resolution {
    /// No deadlock was found
    pub fn is_empty(&self) -> bool {
        self.victims.is_empty()
    }
}

/// Abort-and-replay recovery loop
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadlockResolver;

impl DeadlockResolver {
    /// Create new resolver
    pub const fn new() -> Self {
        Self
    }

    /// Break every deadlock left by row `row`
    pub fn resolve(
        &self,
        dispatcher: &StepDispatcher,
        ctx: &mut SimulationContext,
        schedule: &Schedule,
        row: usize,
    ) -> SimulationResult<Resolution> {
        let mut resolution = Resolution::default();
        if DeadlockDetector::is_deadlocked(&ctx.registry) {
            ctx.deadlocks_resolved += 1;
        }

        while DeadlockDetector::is_deadlocked(&ctx.registry) {
            let Some(victim) = DeadlockDetector::select_victim(&ctx.registry) else {
                break;
            };
            self.abort(ctx, victim, row)?;
            resolution.victims.push(victim);

            ctx.clock.tick();
            let replay = dispatcher.dispatch_row(ctx, schedule, row, RowPass::Replay)?;

            if DeadlockDetector::is_deadlocked(&ctx.registry) {
                ctx.clock.rewind_tick();
                resolution.rollbacks += 1;
                ctx.trace.record(TraceEvent {
                    cycle: ctx.clock.now(),
                    row,
                    task: victim,
                    kind: TraceKind::Rollback,
                });

                for outcome in replay
                    .iter()
                    .filter(|o| o.outcome == DispatchOutcome::Blocked)
                {
                    if ctx.registry.correct_wait(outcome.task) {
                        resolution.corrected.push(outcome.task);
                    }
                }

                warn!(
                    row,
                    cycle = ctx.clock.now(),
                    victim = victim.number(),
                    "replay left the system deadlocked, rolled back its tick"
                );
            }
        }

        Ok(resolution)
    }

    fn abort(&self, ctx: &mut SimulationContext, victim: TaskId, row: usize) -> SimulationResult<()> {
        let now = ctx.clock.now();
        let reclaimed = ctx.ledger.reclaim_all(victim)?;
        ctx.registry.abort(victim, now);

        ctx.trace.record(TraceEvent {
            cycle: now,
            row,
            task: victim,
            kind: TraceKind::Abort { reclaimed },
        });

        info!(
            row,
            cycle = now,
            task = victim.number(),
            reclaimed,
            "deadlock detected, aborted lowest-numbered blocked task"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resources::ResourceId;
    use crate::domain::schedule::ScheduleBuilder;
    use crate::domain::trace::EventTrace;

    const R0: ResourceId = ResourceId::new(0);
    const R1: ResourceId = ResourceId::new(1);
    const T0: TaskId = TaskId::new(0);
    const T1: TaskId = TaskId::new(1);
    const T2: TaskId = TaskId::new(2);

    #[test]
    fn test_no_alive_tasks_is_not_deadlock() {
        let mut registry = TaskRegistry::new(1);
        registry.terminate(T0, 1);
        assert!(!DeadlockDetector::is_deadlocked(&registry));
        assert!(!DeadlockDetector::is_deadlocked(&TaskRegistry::new(0)));
    }

    #[test]
    fn test_partial_blocking_is_not_deadlock() {
        let mut registry = TaskRegistry::new(2);
        registry.block(T0);
        registry.grant(T1);
        assert!(!DeadlockDetector::is_deadlocked(&registry));
    }

    #[test]
    fn test_all_alive_blocked_is_deadlock() {
        let mut registry = TaskRegistry::new(3);
        registry.terminate(T0, 1);
        registry.block(T1);
        registry.block(T2);
        assert!(DeadlockDetector::is_deadlocked(&registry));
    }

    #[test]
    fn test_victim_is_lowest_blocked_id() {
        let mut registry = TaskRegistry::new(3);
        registry.block(T2);
        registry.block(T0);
        registry.block(T1);
        assert_eq!(DeadlockDetector::select_victim(&registry), Some(T0));

        registry.abort(T0, 0);
        assert_eq!(DeadlockDetector::select_victim(&registry), Some(T1));
    }

    #[test]
    fn test_abba_deadlock_resolved_by_aborting_lowest() {
        // T0 holds R0 and wants R1, T1 holds R1 and wants R0
        let schedule = ScheduleBuilder::new(2, vec![1, 1])
            .group(T0, |g| g.request(R0, 1).request(R1, 1))
            .group(T1, |g| g.request(R1, 1).request(R0, 1))
            .build();
        let mut ctx = SimulationContext::new(&schedule, EventTrace::with_capacity(64));
        let dispatcher = StepDispatcher::new();

        dispatcher
            .dispatch_row(&mut ctx, &schedule, 0, RowPass::Primary)
            .unwrap();
        dispatcher
            .dispatch_row(&mut ctx, &schedule, 1, RowPass::Primary)
            .unwrap();
        assert!(DeadlockDetector::is_deadlocked(ctx.registry()));

        let resolution = DeadlockResolver::new()
            .resolve(&dispatcher, &mut ctx, &schedule, 1)
            .unwrap();

        assert_eq!(resolution.victims, vec![T0]);
        assert_eq!(resolution.rollbacks, 0);
        assert_eq!(ctx.registry().status(T0), Some(TaskStatus::Aborted));
        assert_eq!(ctx.registry().status(T1), Some(TaskStatus::Computing));
        assert_eq!(ctx.ledger().held(R0, T1), Ok(1));
        assert_eq!(ctx.deadlocks_resolved(), 1);
        // Provisional tick kept because the replay made progress
        assert_eq!(ctx.clock().now(), 1);
        assert!(ctx.ledger().is_conserved());
    }

    #[test]
    fn test_failed_replay_rolls_back_and_corrects_wait() {
        // T0 holds nothing; T1 and T2 hold what the other wants
        let schedule = ScheduleBuilder::new(3, vec![1, 1])
            .group(T0, |g| g.compute(0).request(R0, 1))
            .group(T1, |g| g.request(R0, 1).request(R1, 1))
            .group(T2, |g| g.request(R1, 1).request(R0, 1))
            .build();
        let mut ctx = SimulationContext::new(&schedule, EventTrace::disabled());
        let dispatcher = StepDispatcher::new();

        dispatcher
            .dispatch_row(&mut ctx, &schedule, 0, RowPass::Primary)
            .unwrap();
        dispatcher
            .dispatch_row(&mut ctx, &schedule, 1, RowPass::Primary)
            .unwrap();

        let resolution = DeadlockResolver::new()
            .resolve(&dispatcher, &mut ctx, &schedule, 1)
            .unwrap();

        assert_eq!(resolution.victims, vec![T0, T1]);
        assert_eq!(resolution.rollbacks, 1);
        assert_eq!(resolution.corrected, vec![T1, T2]);
        assert_eq!(ctx.clock().now(), 1);

        let t2 = ctx.registry().get(T2).unwrap();
        assert_eq!(t2.status(), TaskStatus::Computing);
        assert_eq!(t2.time_spent_waiting(), 1);
        assert_eq!(ctx.registry().aborted_count(), 2);
        // Two victims, one deadlock episode
        assert_eq!(ctx.deadlocks_resolved(), 1);
    }

    #[test]
    fn test_resolve_without_deadlock_counts_nothing() {
        let schedule = ScheduleBuilder::new(1, vec![1])
            .group(T0, |g| g.request(R0, 1))
            .build();
        let mut ctx = SimulationContext::new(&schedule, EventTrace::disabled());
        let dispatcher = StepDispatcher::new();
        dispatcher
            .dispatch_row(&mut ctx, &schedule, 0, RowPass::Primary)
            .unwrap();

        let resolution = DeadlockResolver::new()
            .resolve(&dispatcher, &mut ctx, &schedule, 0)
            .unwrap();
        assert!(resolution.is_empty());
        assert_eq!(ctx.deadlocks_resolved(), 0);
    }
}
