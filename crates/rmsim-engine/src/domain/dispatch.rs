//! Step Dispatcher - applies one activity to the simulation state
//!
//! # Row processing
//!
//! ```text
//! for group in schedule.groups (in order):
//!     if row < group.len: dispatch(group[row])
//! ```
//!
//! A replay pass is the same walk over the same row after a deadlock victim
//! was aborted, except that groups whose task already finished are skipped.

use serde::Serialize;
use tracing::debug;

use super::clock::Cycle;
use super::error::{SimulationError, SimulationResult};
use super::resources::RequestResult;
use super::schedule::{Activity, ActivityKind, Schedule};
use super::simulation::SimulationContext;
use super::tasks::{TaskId, TaskStatus};
use super::trace::{TraceEvent, TraceKind};

/// Result of dispatching one activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Target task was aborted; nothing happened
    Skipped,
    /// Start time recorded
    Initiated,
    /// Clock advanced
    Computed {
        /// Cycles added to the clock
        cycles: Cycle,
    },
    /// Request satisfied
    Granted,
    /// Request could not be satisfied
    Blocked,
    /// Units returned
    Released,
    /// Task finished and its holdings were reclaimed
    Terminated,
}

/// Which walk over a row produced a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPass {
    /// First walk over the row
    Primary,
    /// Re-walk after a deadlock victim was aborted
    Replay,
}

/// Outcome of one group's activity within a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOutcome {
    /// Group index
    pub group: usize,
    /// Activity id
    pub activity: usize,
    /// Target task
    pub task: TaskId,
    /// What happened
    pub outcome: DispatchOutcome,
}

/// Stateless dispatcher
///
/// Like the simulator's other components it does not own any state; it
/// operates on a borrowed [`SimulationContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StepDispatcher;

impl StepDispatcher {
    /// Create new dispatcher
    pub const fn new() -> Self {
        Self
    }

    /// Apply one activity
    ///
    /// # Errors
    /// - `ActivityAfterTermination`: the target task already terminated
    /// - `UnknownTask`: the target task does not exist
    /// - `Ledger`: a release exceeded the task's holdings, or a resource
    ///   reference was out of range
    pub fn dispatch(
        &self,
        ctx: &mut SimulationContext,
        activity: &Activity,
    ) -> SimulationResult<DispatchOutcome> {
        let task = activity.task;
        let status = ctx.registry.status(task).ok_or(SimulationError::UnknownTask {
            activity: activity.id,
            task,
        })?;

        match status {
            TaskStatus::Terminated => {
                return Err(SimulationError::ActivityAfterTermination {
                    activity: activity.id,
                    task,
                    kind: activity.kind.name(),
                });
            }
            TaskStatus::Aborted => return Ok(DispatchOutcome::Skipped),
            _ => {}
        }

        let now = ctx.clock.now();
        let outcome = match activity.kind {
            // The claim only matters to a banker; the opportunistic manager
            // records the start time and nothing else.
            ActivityKind::Initiate { .. } => {
                ctx.registry.record_start(task, now);
                DispatchOutcome::Initiated
            }
            ActivityKind::Compute { cycles } => {
                ctx.clock.advance(cycles);
                DispatchOutcome::Computed { cycles }
            }
            ActivityKind::Request { resource, units } => {
                match ctx.ledger.try_allocate(resource, task, units)? {
                    RequestResult::Granted => {
                        ctx.registry.grant(task);
                        DispatchOutcome::Granted
                    }
                    RequestResult::Blocked => {
                        ctx.registry.block(task);
                        DispatchOutcome::Blocked
                    }
                }
            }
            ActivityKind::Release { resource, units } => {
                ctx.ledger.release(resource, task, units)?;
                DispatchOutcome::Released
            }
            ActivityKind::Terminate => {
                ctx.ledger.reclaim_all(task)?;
                ctx.registry.terminate(task, now);
                DispatchOutcome::Terminated
            }
        };

        debug!(
            cycle = now,
            activity = activity.id,
            task = task.number(),
            kind = activity.kind.name(),
            ?outcome,
            "dispatched"
        );

        Ok(outcome)
    }

    /// Dispatch the `row`-th activity of every group, in group order
    ///
    /// During a [`RowPass::Replay`] groups whose task is terminated or
    /// aborted are skipped entirely.
    pub fn dispatch_row(
        &self,
        ctx: &mut SimulationContext,
        schedule: &Schedule,
        row: usize,
        pass: RowPass,
    ) -> SimulationResult<Vec<RowOutcome>> {
        let mut outcomes = Vec::with_capacity(schedule.group_count());

        for (group, activities) in schedule.groups().iter().enumerate() {
            let Some(activity) = activities.get(row) else {
                continue;
            };
            if pass == RowPass::Replay && !ctx.registry.is_live(activity.task) {
                continue;
            }

            let cycle = ctx.clock.now();
            let outcome = self.dispatch(ctx, activity)?;

            ctx.trace.record(TraceEvent {
                cycle,
                row,
                task: activity.task,
                kind: TraceKind::Dispatch {
                    pass,
                    activity: activity.id,
                    kind: activity.kind,
                    outcome,
                },
            });

            outcomes.push(RowOutcome {
                group,
                activity: activity.id,
                task: activity.task,
                outcome,
            });
        }

        Ok(outcomes)
    }
}
