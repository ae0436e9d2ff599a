//! TaskRegistry - owns every task and the terminated/aborted counters

use super::types::{Task, TaskId, TaskStatus};
use crate::domain::clock::Cycle;

/// All tasks of a run, indexed by `TaskId`
///
/// The counters change only on the first transition into a final status,
/// so `alive + terminated + aborted == len` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
    terminated: usize,
    aborted: usize,
}

impl TaskRegistry {
    /// Registry of `count` fresh tasks
    pub fn new(count: usize) -> Self {
        Self {
            tasks: (0..count).map(|index| Task::new(TaskId::new(index))).collect(),
            terminated: 0,
            aborted: 0,
        }
    }

    /// Number of tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True if there are no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.as_usize())
    }

    /// All tasks in id order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Status of a task, if it exists
    pub fn status(&self, id: TaskId) -> Option<TaskStatus> {
        self.get(id).map(Task::status)
    }

    /// Whether a task exists and is neither terminated nor aborted
    pub fn is_live(&self, id: TaskId) -> bool {
        self.status(id).is_some_and(TaskStatus::is_live)
    }

    /// Tasks that terminated normally
    pub const fn terminated_count(&self) -> usize {
        self.terminated
    }

    /// Tasks aborted to break deadlocks
    pub const fn aborted_count(&self) -> usize {
        self.aborted
    }

    /// Tasks neither terminated nor aborted
    pub const fn alive_count(&self) -> usize {
        self.tasks.len() - self.terminated - self.aborted
    }

    /// Tasks currently blocked
    pub fn blocked_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.status() == TaskStatus::Blocked)
            .count()
    }

    pub(crate) fn record_start(&mut self, id: TaskId, now: Cycle) {
        if let Some(task) = self.tasks.get_mut(id.as_usize()) {
            task.record_start(now);
        }
    }

    pub(crate) fn grant(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.get_mut(id.as_usize()) {
            task.grant();
        }
    }

    pub(crate) fn block(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.get_mut(id.as_usize()) {
            task.block();
        }
    }

    /// Mark a live task terminated at `now`
    pub(crate) fn terminate(&mut self, id: TaskId, now: Cycle) -> bool {
        self.finish(id, TaskStatus::Terminated, now)
    }

    /// Mark a live task aborted at `now`
    pub(crate) fn abort(&mut self, id: TaskId, now: Cycle) -> bool {
        self.finish(id, TaskStatus::Aborted, now)
    }

    pub(crate) fn correct_wait(&mut self, id: TaskId) -> bool {
        self.tasks
            .get_mut(id.as_usize())
            .is_some_and(Task::correct_wait)
    }

    /// Back to the initial state (every task NotStarted, counters zero)
    pub fn reset(&mut self) {
        for task in &mut self.tasks {
            task.reset();
        }
        self.terminated = 0;
        self.aborted = 0;
    }

    fn finish(&mut self, id: TaskId, status: TaskStatus, now: Cycle) -> bool {
        let Some(task) = self.tasks.get_mut(id.as_usize()) else {
            return false;
        };
        if task.status().is_final() {
            return false;
        }

        task.finish(status, now);
        match status {
            TaskStatus::Terminated => self.terminated += 1,
            TaskStatus::Aborted => self.aborted += 1,
            _ => {}
        }
        true
    }
}
