//! Schedule Model
//!
//! A schedule is the immutable input of a run: the task population, the
//! capacity of every resource type and an ordered list of activity groups.
//! Row `r` of the simulation is the `r`-th activity of every group that is
//! long enough, dispatched in group order.

pub mod builder;
pub mod types;

pub use builder::{GroupBuilder, ScheduleBuilder};
pub use types::{Activity, ActivityGroup, ActivityKind, Schedule};
