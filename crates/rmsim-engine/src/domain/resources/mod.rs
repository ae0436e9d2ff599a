//! Resource Ledger
//!
//! Tracks, for every resource type, how many units are free and how many
//! each task holds. All mutations go through [`ResourceLedger`], which keeps
//! the conservation law `available + sum(held) == total` after every call.

pub mod ledger;
pub mod types;

#[cfg(kani)]
mod proofs;

pub use ledger::{ResourceLedger, ResourcePool};
pub use types::{LedgerError, RequestResult, ResourceId, Units};
