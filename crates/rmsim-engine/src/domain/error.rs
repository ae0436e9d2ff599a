//! Simulation errors
//!
//! Everything here is fatal for a run: the simulator stops and the error is
//! surfaced to the caller unchanged.

use thiserror::Error;

use super::resources::{LedgerError, ResourceId};
use super::tasks::TaskId;

/// Fatal errors raised while validating or running a schedule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// An activity was dispatched to a task that already terminated
    #[error("activity #{activity} ({kind}) targets {task}, which already terminated")]
    ActivityAfterTermination {
        /// Activity id (line order in the schedule)
        activity: usize,
        /// Target task
        task: TaskId,
        /// Activity kind name
        kind: &'static str,
    },

    /// An activity names a task outside the schedule's population
    #[error("activity #{activity} references unknown {task}")]
    UnknownTask {
        /// Activity id
        activity: usize,
        /// Referenced task
        task: TaskId,
    },

    /// An activity names a resource type the schedule does not declare
    #[error("activity #{activity} references unknown {resource}")]
    UnknownResource {
        /// Activity id
        activity: usize,
        /// Referenced resource
        resource: ResourceId,
    },

    /// Ledger rejected an operation (e.g. releasing more than held)
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result alias for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
