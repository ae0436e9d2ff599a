//! rmsim Resource-Manager Simulator
//!
//! # Overview
//!
//! `rmsim-engine` is a deterministic simulator of an opportunistic (FIFO)
//! resource manager. A fixed population of tasks executes scripted
//! activities against a pool of typed, countable resources. Requests are
//! granted whenever enough units are free; when every live task is blocked
//! the simulator breaks the deadlock by aborting the lowest-numbered
//! blocked task and replaying the interrupted row.
//!
//! # Trinity Architecture
//!
//! This crate follows the Trinity Architecture pattern:
//!
//! - **Domain**: ledger, task registry, dispatcher, deadlock resolver, report
//! - **Infrastructure**: schedule loading and configuration
//! - **Adapters**: text and JSON rendering of the run report
//!
//! # Laws (Invariants)
//!
//! - **Conservation**: for every resource, `available + held == total`
//! - **Accounting**: `alive + terminated + aborted == tasks`
//! - **Finality**: terminated and aborted tasks never change again
//! - **Determinism**: the same schedule always yields the same report
//!
//! # Usage
//!
//! ```rust
//! use rmsim_engine::domain::SimulatorBuilder;
//! use rmsim_engine::infrastructure::{parse_schedule, SimulationConfig};
//!
//! let text = "1 1 2\n\
//!             initiate 1 1 2\n\
//!             request 1 1 2\n\
//!             compute 1 3 0\n\
//!             release 1 1 2\n\
//!             terminate 1 0 0\n";
//!
//! let schedule = parse_schedule(text, &SimulationConfig::default()).unwrap();
//! let mut sim = SimulatorBuilder::new(schedule).build().unwrap();
//! let report = sim.run().unwrap();
//!
//! assert_eq!(report.aborted_tasks, 0);
//! assert_eq!(report.tasks[0].waiting, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// Trinity Architecture Layers
pub mod adapters;
pub mod domain;
pub mod infrastructure;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-export Primary Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Identifiers and units
pub use domain::{Cycle, ResourceId, TaskId, Units};

// Schedule model
pub use domain::{Activity, ActivityGroup, ActivityKind, Schedule, ScheduleBuilder};

// Engine
pub use domain::{
    DispatchOutcome, LedgerError, ManagerKind, RowPass, SimulationContext, SimulationError,
    Simulator, SimulatorBuilder,
};

// Results
pub use domain::{RunReport, TaskStatus, TaskSummary};

// Loading and configuration
pub use infrastructure::{load_schedule_file, parse_schedule, SimulationConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_defined() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_core_types_exported() {
        let _task = TaskId::new(0);
        let _resource = ResourceId::new(0);
        let _status = TaskStatus::NotStarted;
        let _manager = ManagerKind::Opportunistic;
    }
}
