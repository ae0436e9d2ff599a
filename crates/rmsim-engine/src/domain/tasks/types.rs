//! Core Types for Task Lifecycle

use std::fmt;

use serde::Serialize;

use crate::domain::clock::Cycle;

/// Task identifier (0-based slot, displayed 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub usize);

impl TaskId {
    /// Create a new task identifier
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying usize value
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// 1-based number as written in schedule files and reports
    #[inline(always)]
    pub const fn number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {}", self.number())
    }
}

/// Task lifecycle status
///
/// ```text
/// NotStarted ──granted──> Computing <──granted/blocked──> Blocked
///     │                       │                             │
///     └──────terminate────────┴────> Terminated             └──deadlock──> Aborted
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// No request has been evaluated yet
    #[default]
    NotStarted,
    /// Last request was granted
    Computing,
    /// Last request could not be satisfied
    Blocked,
    /// Finished normally (final)
    Terminated,
    /// Killed to break a deadlock (final)
    Aborted,
}

impl TaskStatus {
    /// Neither terminated nor aborted
    #[inline]
    pub const fn is_live(self) -> bool {
        !self.is_final()
    }

    /// Terminated or aborted
    #[inline]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Terminated | Self::Aborted)
    }

    /// Lower-case name used in logs and reports
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Computing => "computing",
            Self::Blocked => "blocked",
            Self::Terminated => "terminated",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simulated task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    status: TaskStatus,
    start_time: Cycle,
    terminate_time: Cycle,
    time_spent_waiting: Cycle,
    wait_corrected: bool,
}

impl Task {
    /// Fresh task that has not started
    pub const fn new(id: TaskId) -> Self {
        Self {
            id,
            status: TaskStatus::NotStarted,
            start_time: 0,
            terminate_time: 0,
            time_spent_waiting: 0,
            wait_corrected: false,
        }
    }

    /// Identifier
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Current status
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Cycle of the most recent `initiate`
    pub const fn start_time(&self) -> Cycle {
        self.start_time
    }

    /// Cycle the task terminated or was aborted (0 while live)
    pub const fn terminate_time(&self) -> Cycle {
        self.terminate_time
    }

    /// Cycles spent blocked
    pub const fn time_spent_waiting(&self) -> Cycle {
        self.time_spent_waiting
    }

    /// `terminate_time - start_time` for terminated tasks
    pub const fn turnaround(&self) -> Option<Cycle> {
        match self.status {
            TaskStatus::Terminated => Some(self.terminate_time.saturating_sub(self.start_time)),
            _ => None,
        }
    }

    pub(crate) fn record_start(&mut self, now: Cycle) {
        self.start_time = now;
    }

    pub(crate) fn grant(&mut self) {
        self.status = TaskStatus::Computing;
    }

    pub(crate) fn block(&mut self) {
        self.status = TaskStatus::Blocked;
        self.time_spent_waiting += 1;
    }

    pub(crate) fn finish(&mut self, status: TaskStatus, now: Cycle) {
        debug_assert!(status.is_final());
        self.status = status;
        self.terminate_time = now;
    }

    /// Remove the wait cycle charged by a replay that did not help.
    /// Applies at most once per run.
    pub(crate) fn correct_wait(&mut self) -> bool {
        if self.wait_corrected {
            return false;
        }
        self.wait_corrected = true;
        self.time_spent_waiting = self.time_spent_waiting.saturating_sub(1);
        true
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_display_is_one_based() {
        assert_eq!(TaskId::new(0).to_string(), "task 1");
        assert_eq!(TaskId::new(4).number(), 5);
    }

    #[test]
    fn test_block_charges_wait() {
        let mut task = Task::new(TaskId::new(0));
        task.block();
        task.block();
        assert_eq!(task.status(), TaskStatus::Blocked);
        assert_eq!(task.time_spent_waiting(), 2);
    }

    #[test]
    fn test_correct_wait_only_once() {
        let mut task = Task::new(TaskId::new(0));
        task.block();
        task.block();

        assert!(task.correct_wait());
        assert!(!task.correct_wait());
        assert_eq!(task.time_spent_waiting(), 1);
    }

    #[test]
    fn test_correct_wait_saturates() {
        let mut task = Task::new(TaskId::new(0));
        assert!(task.correct_wait());
        assert_eq!(task.time_spent_waiting(), 0);
    }

    #[test]
    fn test_turnaround_only_when_terminated() {
        let mut task = Task::new(TaskId::new(0));
        task.record_start(2);
        assert_eq!(task.turnaround(), None);

        task.finish(TaskStatus::Terminated, 9);
        assert_eq!(task.turnaround(), Some(7));

        let mut aborted = Task::new(TaskId::new(1));
        aborted.finish(TaskStatus::Aborted, 3);
        assert_eq!(aborted.turnaround(), None);
    }

    #[test]
    fn test_status_finality() {
        assert!(TaskStatus::Computing.is_live());
        assert!(TaskStatus::Terminated.is_final());
        assert!(TaskStatus::Aborted.is_final());
        assert!(!TaskStatus::Blocked.is_final());
    }
}
