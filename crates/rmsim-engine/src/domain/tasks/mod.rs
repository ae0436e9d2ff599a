//! Task Registry
//!
//! Per-task lifecycle state and the running counters the deadlock detector
//! reads.

pub mod registry;
pub mod types;

pub use registry::TaskRegistry;
pub use types::{Task, TaskId, TaskStatus};
