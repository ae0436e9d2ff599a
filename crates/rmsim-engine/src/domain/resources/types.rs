//! Core Types for Resource Accounting

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::tasks::TaskId;

/// Count of resource units
pub type Units = u32;

/// Resource type identifier (0-based, displayed 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(pub usize);

impl ResourceId {
    /// Create a new resource identifier
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying usize value
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// 1-based number as written in schedule files
    #[inline(always)]
    pub const fn number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource {}", self.number())
    }
}

/// Outcome of a request against the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestResult {
    /// All requested units were allocated
    Granted,
    /// Not enough units were free; nothing changed
    Blocked,
}

/// Ledger errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Resource ID out of bounds
    #[error("unknown {0}")]
    InvalidResourceId(ResourceId),

    /// Task ID out of bounds
    #[error("unknown {0}")]
    InvalidTaskId(TaskId),

    /// Task tried to give back more than it holds
    #[error("{task} released {requested} unit(s) of {resource} but holds {held}")]
    OverRelease {
        /// Releasing task
        task: TaskId,
        /// Resource being released
        resource: ResourceId,
        /// Units the task actually holds
        held: Units,
        /// Units it tried to release
        requested: Units,
    },
}
