//! Activities, groups and the schedule itself

use std::fmt;

use serde::Serialize;

use crate::domain::clock::Cycle;
use crate::domain::error::{SimulationError, SimulationResult};
use crate::domain::resources::{ResourceId, Units};
use crate::domain::tasks::TaskId;

/// What an activity asks the manager to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityKind {
    /// Record the task's start time; the claim is informational
    Initiate {
        /// Resource the claim refers to
        resource: ResourceId,
        /// Declared maximum need
        claim: Units,
    },
    /// Acquire units, all or nothing
    Request {
        /// Requested resource
        resource: ResourceId,
        /// Units requested
        units: Units,
    },
    /// Advance the clock
    Compute {
        /// Cycles spent computing
        cycles: Cycle,
    },
    /// Give units back
    Release {
        /// Released resource
        resource: ResourceId,
        /// Units released
        units: Units,
    },
    /// Finish the task and reclaim everything it holds
    Terminate,
}

impl ActivityKind {
    /// Keyword used in schedule files
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Initiate { .. } => "initiate",
            Self::Request { .. } => "request",
            Self::Compute { .. } => "compute",
            Self::Release { .. } => "release",
            Self::Terminate => "terminate",
        }
    }

    /// Resource the activity refers to, if any
    pub const fn resource(&self) -> Option<ResourceId> {
        match self {
            Self::Initiate { resource, .. }
            | Self::Request { resource, .. }
            | Self::Release { resource, .. } => Some(*resource),
            Self::Compute { .. } | Self::Terminate => None,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One scripted step of one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Activity {
    /// Position in the schedule (0-based, input order)
    pub id: usize,
    /// Task the activity is dispatched to
    pub task: TaskId,
    /// What to do
    #[serde(flatten)]
    pub kind: ActivityKind,
}

impl Activity {
    /// Create an activity
    pub const fn new(id: usize, task: TaskId, kind: ActivityKind) -> Self {
        Self { id, task, kind }
    }
}

/// Ordered run of activities, usually all for one task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityGroup {
    activities: Vec<Activity>,
}

impl ActivityGroup {
    /// Wrap a list of activities
    pub const fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    /// Number of activities
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// True if the group has no activities
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Activity at `row`, if the group is that long
    pub fn get(&self, row: usize) -> Option<&Activity> {
        self.activities.get(row)
    }

    /// Activities in order
    pub fn iter(&self) -> std::slice::Iter<'_, Activity> {
        self.activities.iter()
    }
}

impl From<Vec<Activity>> for ActivityGroup {
    fn from(activities: Vec<Activity>) -> Self {
        Self::new(activities)
    }
}

/// Immutable input of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    task_count: usize,
    capacities: Vec<Units>,
    groups: Vec<ActivityGroup>,
}

impl Schedule {
    /// Assemble a schedule; call [`validate`](Self::validate) before running
    pub fn new(task_count: usize, capacities: Vec<Units>, groups: Vec<ActivityGroup>) -> Self {
        Self {
            task_count,
            capacities,
            groups,
        }
    }

    /// Task population
    pub const fn task_count(&self) -> usize {
        self.task_count
    }

    /// Initial units per resource type
    pub fn capacities(&self) -> &[Units] {
        &self.capacities
    }

    /// Number of resource types
    pub fn resource_count(&self) -> usize {
        self.capacities.len()
    }

    /// Groups in dispatch order
    pub fn groups(&self) -> &[ActivityGroup] {
        &self.groups
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Length of the longest group, i.e. the number of rows
    pub fn max_group_len(&self) -> usize {
        self.groups.iter().map(ActivityGroup::len).max().unwrap_or(0)
    }

    /// Total number of activities
    pub fn activity_count(&self) -> usize {
        self.groups.iter().map(ActivityGroup::len).sum()
    }

    /// Activity of `group` at `row`
    pub fn activity_at(&self, group: usize, row: usize) -> Option<&Activity> {
        self.groups.get(group).and_then(|g| g.get(row))
    }

    /// Check every task and resource reference
    pub fn validate(&self) -> SimulationResult<()> {
        for activity in self.groups.iter().flat_map(ActivityGroup::iter) {
            if activity.task.as_usize() >= self.task_count {
                return Err(SimulationError::UnknownTask {
                    activity: activity.id,
                    task: activity.task,
                });
            }
            if let Some(resource) = activity.kind.resource() {
                if resource.as_usize() >= self.capacities.len() {
                    return Err(SimulationError::UnknownResource {
                        activity: activity.id,
                        resource,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::{GroupBuilder, ScheduleBuilder};

    #[test]
    fn test_shape_queries() {
        let r0 = ResourceId::new(0);
        let schedule = ScheduleBuilder::new(2, vec![1])
            .group(TaskId::new(0), |g| g.initiate(r0, 1).terminate())
            .group(TaskId::new(1), |g| {
                g.initiate(r0, 1).request(r0, 1).release(r0, 1).terminate()
            })
            .build();

        assert_eq!(schedule.group_count(), 2);
        assert_eq!(schedule.max_group_len(), 4);
        assert_eq!(schedule.activity_count(), 6);
        assert!(schedule.activity_at(0, 2).is_none());
        assert_eq!(
            schedule.activity_at(1, 1).map(|a| a.kind),
            Some(ActivityKind::Request {
                resource: r0,
                units: 1
            })
        );
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_resource() {
        let schedule = ScheduleBuilder::new(1, vec![1])
            .group(TaskId::new(0), |g| g.request(ResourceId::new(3), 1))
            .build();

        assert_eq!(
            schedule.validate(),
            Err(SimulationError::UnknownResource {
                activity: 0,
                resource: ResourceId::new(3),
            })
        );
    }

    #[test]
    fn test_validate_rejects_unknown_task() {
        let schedule = ScheduleBuilder::new(1, vec![1])
            .group(TaskId::new(1), GroupBuilder::terminate)
            .build();

        assert!(matches!(
            schedule.validate(),
            Err(SimulationError::UnknownTask { activity: 0, .. })
        ));
    }

    #[test]
    fn test_empty_schedule_has_no_rows() {
        let schedule = Schedule::new(0, Vec::new(), Vec::new());
        assert_eq!(schedule.max_group_len(), 0);
    }
}
