//! Logical Clock
//!
//! The simulation counts time in cycles. The clock only moves through the
//! operations below:
//!
//! - `tick`: one cycle at the end of every row
//! - `advance`: a `compute` activity's cycle count
//! - `rewind_tick`: undo a provisional tick taken before a failed replay

/// Simulation time in cycles
pub type Cycle = u64;

/// Monotone cycle counter with a single provisional-tick rollback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalClock {
    now: Cycle,
}

impl LogicalClock {
    /// Clock at cycle zero
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    /// Current cycle
    #[inline]
    pub const fn now(&self) -> Cycle {
        self.now
    }

    /// Advance by one cycle
    #[inline]
    pub fn tick(&mut self) {
        self.advance(1);
    }

    /// Advance by `cycles`
    #[inline]
    pub fn advance(&mut self, cycles: Cycle) {
        self.now = self.now.saturating_add(cycles);
    }

    /// Take back a tick that turned out to be provisional
    #[inline]
    pub fn rewind_tick(&mut self) {
        self.now = self.now.saturating_sub(1);
    }

    /// Back to cycle zero
    pub fn reset(&mut self) {
        self.now = 0;
    }
}
