//! ResourceLedger - free units and per-task holdings
//!
//! # Design
//!
//! - One [`ResourcePool`] per resource type, indexed by `ResourceId`
//! - Holdings are a dense `Vec<Units>` indexed by `TaskId` (no HashMap)
//! - A request is all-or-nothing: either every unit is granted or nothing
//!   changes

use super::types::{LedgerError, RequestResult, ResourceId, Units};
use crate::domain::tasks::TaskId;

/// Accounting for a single resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePool {
    id: ResourceId,
    total: Units,
    available: Units,
    held: Vec<Units>,
}

impl ResourcePool {
    /// Create a pool with every unit free
    pub fn new(id: ResourceId, total: Units, num_tasks: usize) -> Self {
        Self {
            id,
            total,
            available: total,
            held: vec![0; num_tasks],
        }
    }

    /// Resource type this pool accounts for
    pub const fn id(&self) -> ResourceId {
        self.id
    }

    /// Initial capacity
    pub const fn total(&self) -> Units {
        self.total
    }

    /// Units currently free
    pub const fn available(&self) -> Units {
        self.available
    }

    /// Units currently held by `task`
    pub fn held_by(&self, task: TaskId) -> Units {
        self.held.get(task.as_usize()).copied().unwrap_or(0)
    }

    /// Sum of all holdings
    pub fn held_total(&self) -> u64 {
        self.held.iter().map(|&units| u64::from(units)).sum()
    }

    /// `available + held == total`
    pub fn is_conserved(&self) -> bool {
        u64::from(self.available) + self.held_total() == u64::from(self.total)
    }

    fn reset(&mut self) {
        self.available = self.total;
        self.held.fill(0);
    }
}

/// Ledger over every resource type in a schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLedger {
    pools: Vec<ResourcePool>,
    num_tasks: usize,
}

impl ResourceLedger {
    /// Create a ledger from per-resource capacities
    pub fn new(capacities: &[Units], num_tasks: usize) -> Self {
        let pools = capacities
            .iter()
            .enumerate()
            .map(|(index, &total)| ResourcePool::new(ResourceId::new(index), total, num_tasks))
            .collect();
        Self { pools, num_tasks }
    }

    /// Number of resource types
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// True if the schedule declared no resource types
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Pool for a resource type
    pub fn pool(&self, resource: ResourceId) -> Option<&ResourcePool> {
        self.pools.get(resource.as_usize())
    }

    /// Units of `resource` currently free
    pub fn available(&self, resource: ResourceId) -> Result<Units, LedgerError> {
        self.pool(resource)
            .map(ResourcePool::available)
            .ok_or(LedgerError::InvalidResourceId(resource))
    }

    /// Units of `resource` currently held by `task`
    pub fn held(&self, resource: ResourceId, task: TaskId) -> Result<Units, LedgerError> {
        self.check_task(task)?;
        self.pool(resource)
            .map(|pool| pool.held_by(task))
            .ok_or(LedgerError::InvalidResourceId(resource))
    }

    /// Try to allocate `units` of `resource` to `task`
    ///
    /// Grants only if `available >= units`; otherwise the ledger is left
    /// untouched and [`RequestResult::Blocked`] is returned.
    pub fn try_allocate(
        &mut self,
        resource: ResourceId,
        task: TaskId,
        units: Units,
    ) -> Result<RequestResult, LedgerError> {
        self.check_task(task)?;
        let pool = self.pool_mut(resource)?;

        if pool.available < units {
            return Ok(RequestResult::Blocked);
        }

        pool.available -= units;
        pool.held[task.as_usize()] += units;
        Ok(RequestResult::Granted)
    }

    /// Return `units` of `resource` from `task` to the free pool
    pub fn release(
        &mut self,
        resource: ResourceId,
        task: TaskId,
        units: Units,
    ) -> Result<(), LedgerError> {
        self.check_task(task)?;
        let pool = self.pool_mut(resource)?;
        let held = pool.held[task.as_usize()];

        if held < units {
            return Err(LedgerError::OverRelease {
                task,
                resource,
                held,
                requested: units,
            });
        }

        pool.held[task.as_usize()] = held - units;
        pool.available += units;
        Ok(())
    }

    /// Reclaim everything `task` holds, across all resource types
    ///
    /// # Returns
    /// Total number of units returned to the free pools
    pub fn reclaim_all(&mut self, task: TaskId) -> Result<u64, LedgerError> {
        self.check_task(task)?;
        let index = task.as_usize();
        let mut reclaimed = 0u64;

        for pool in &mut self.pools {
            let held = std::mem::take(&mut pool.held[index]);
            pool.available += held;
            reclaimed += u64::from(held);
        }

        Ok(reclaimed)
    }

    /// Conservation holds for every pool
    pub fn is_conserved(&self) -> bool {
        self.pools.iter().all(ResourcePool::is_conserved)
    }

    /// Restore every pool to its initial capacity
    pub fn reset(&mut self) {
        for pool in &mut self.pools {
            pool.reset();
        }
    }

    #[inline]
    const fn check_task(&self, task: TaskId) -> Result<(), LedgerError> {
        if task.as_usize() < self.num_tasks {
            Ok(())
        } else {
            Err(LedgerError::InvalidTaskId(task))
        }
    }

    #[inline]
    fn pool_mut(&mut self, resource: ResourceId) -> Result<&mut ResourcePool, LedgerError> {
        self.pools
            .get_mut(resource.as_usize())
            .ok_or(LedgerError::InvalidResourceId(resource))
    }
}
