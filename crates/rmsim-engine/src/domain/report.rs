//! Run report - per-task outcome and wait statistics
//!
//! Aborted tasks appear in the task list but contribute nothing to the
//! totals. Percentages are `100 * waiting / turnaround`, and 0 when the
//! turnaround is 0.

use serde::Serialize;

use super::clock::Cycle;
use super::manager::ManagerKind;
use super::simulation::SimulationContext;
use super::tasks::{Task, TaskStatus};

/// Outcome of one task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSummary {
    /// 1-based task number
    pub task: usize,
    /// Final status
    pub status: TaskStatus,
    /// Cycle of the last `initiate`
    pub start_time: Cycle,
    /// Cycle of termination or abort
    pub terminate_time: Cycle,
    /// `terminate_time - start_time`, for terminated tasks only
    pub turnaround: Option<Cycle>,
    /// Cycles spent blocked
    pub waiting: Cycle,
    /// Waiting as a share of turnaround, for terminated tasks only
    pub wait_percent: Option<f64>,
}

impl TaskSummary {
    fn from_task(task: &Task) -> Self {
        let turnaround = task.turnaround();
        Self {
            task: task.id().number(),
            status: task.status(),
            start_time: task.start_time(),
            terminate_time: task.terminate_time(),
            turnaround,
            waiting: task.time_spent_waiting(),
            wait_percent: turnaround.map(|t| percent(task.time_spent_waiting(), t)),
        }
    }

    /// Whether the task was killed to break a deadlock
    pub fn is_aborted(&self) -> bool {
        self.status == TaskStatus::Aborted
    }
}

/// Result of a complete run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Simulated manager
    pub manager: ManagerKind,
    /// One entry per task, in task order
    pub tasks: Vec<TaskSummary>,
    /// Sum of turnarounds of terminated tasks
    pub total_turnaround: Cycle,
    /// Sum of waiting of terminated tasks
    pub total_waiting: Cycle,
    /// `100 * total_waiting / total_turnaround`
    pub wait_percent: f64,
    /// Tasks aborted to break deadlocks
    pub aborted_tasks: usize,
    /// Rows that ended deadlocked and went through recovery
    pub deadlocks_resolved: usize,
    /// Clock value when the run ended
    pub final_cycle: Cycle,
}

impl RunReport {
    /// Summarize the state in `ctx`
    pub fn from_context(manager: ManagerKind, ctx: &SimulationContext) -> Self {
        let tasks: Vec<TaskSummary> = ctx.registry().iter().map(TaskSummary::from_task).collect();

        let (total_turnaround, total_waiting) = tasks
            .iter()
            .filter_map(|summary| summary.turnaround.map(|t| (t, summary.waiting)))
            .fold((0, 0), |(turn, wait), (t, w)| (turn + t, wait + w));

        Self {
            manager,
            tasks,
            total_turnaround,
            total_waiting,
            wait_percent: percent(total_waiting, total_turnaround),
            aborted_tasks: ctx.registry().aborted_count(),
            deadlocks_resolved: ctx.deadlocks_resolved(),
            final_cycle: ctx.clock().now(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(waiting: Cycle, turnaround: Cycle) -> f64 {
    if turnaround == 0 {
        0.0
    } else {
        waiting as f64 / turnaround as f64 * 100.0
    }
}
