//! Fluent construction of schedules in code

use super::types::{Activity, ActivityGroup, ActivityKind, Schedule};
use crate::domain::clock::Cycle;
use crate::domain::resources::{ResourceId, Units};
use crate::domain::tasks::TaskId;

/// Builds a [`Schedule`] group by group, numbering activities in order
///
/// # Example
/// ```rust
/// use rmsim_engine::domain::ScheduleBuilder;
/// use rmsim_engine::{ResourceId, TaskId};
///
/// let r0 = ResourceId::new(0);
/// let schedule = ScheduleBuilder::new(1, vec![2])
///     .group(TaskId::new(0), |g| g.initiate(r0, 2).request(r0, 2).compute(4).release(r0, 2).terminate())
///     .build();
///
/// assert_eq!(schedule.max_group_len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    task_count: usize,
    capacities: Vec<Units>,
    groups: Vec<ActivityGroup>,
    next_id: usize,
}

impl ScheduleBuilder {
    /// Start a schedule with `task_count` tasks and the given capacities
    pub fn new(task_count: usize, capacities: Vec<Units>) -> Self {
        Self {
            task_count,
            capacities,
            groups: Vec::new(),
            next_id: 0,
        }
    }

    /// Append a group whose activities all target `task`
    #[must_use]
    pub fn group<F>(mut self, task: TaskId, build: F) -> Self
    where
        F: FnOnce(GroupBuilder) -> GroupBuilder,
    {
        let group = build(GroupBuilder {
            task,
            next_id: self.next_id,
            activities: Vec::new(),
        });
        self.next_id = group.next_id;
        self.groups.push(ActivityGroup::new(group.activities));
        self
    }

    /// Finish the schedule
    pub fn build(self) -> Schedule {
        Schedule::new(self.task_count, self.capacities, self.groups)
    }
}

/// Appends activities for one task
#[derive(Debug, Clone)]
pub struct GroupBuilder {
    task: TaskId,
    next_id: usize,
    activities: Vec<Activity>,
}

impl GroupBuilder {
    /// `initiate`
    #[must_use]
    pub fn initiate(self, resource: ResourceId, claim: Units) -> Self {
        self.push(ActivityKind::Initiate { resource, claim })
    }

    /// `request`
    #[must_use]
    pub fn request(self, resource: ResourceId, units: Units) -> Self {
        self.push(ActivityKind::Request { resource, units })
    }

    /// `compute`
    #[must_use]
    pub fn compute(self, cycles: Cycle) -> Self {
        self.push(ActivityKind::Compute { cycles })
    }

    /// `release`
    #[must_use]
    pub fn release(self, resource: ResourceId, units: Units) -> Self {
        self.push(ActivityKind::Release { resource, units })
    }

    /// `terminate`
    #[must_use]
    pub fn terminate(self) -> Self {
        self.push(ActivityKind::Terminate)
    }

    fn push(mut self, kind: ActivityKind) -> Self {
        self.activities
            .push(Activity::new(self.next_id, self.task, kind));
        self.next_id += 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_ids_run_across_groups() {
        let r0 = ResourceId::new(0);
        let schedule = ScheduleBuilder::new(2, vec![1])
            .group(TaskId::new(0), |g| g.request(r0, 1).terminate())
            .group(TaskId::new(1), |g| g.compute(2).terminate())
            .build();

        let ids: Vec<usize> = schedule
            .groups()
            .iter()
            .flat_map(ActivityGroup::iter)
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(
            schedule.activity_at(1, 0).map(|a| a.task),
            Some(TaskId::new(1))
        );
    }
}
