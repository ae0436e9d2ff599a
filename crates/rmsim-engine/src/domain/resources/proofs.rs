//! Kani proofs for ledger conservation

#![cfg(kani)]

use super::ledger::ResourceLedger;
use super::types::ResourceId;
use crate::domain::tasks::TaskId;

#[kani::proof]
#[kani::unwind(4)]
fn proof_ledger_conserves_units() {
    let capacity: u32 = kani::any();
    kani::assume(capacity <= 8);

    let mut ledger = ResourceLedger::new(&[capacity], 2);
    let resource = ResourceId::new(0);
    let task = TaskId::new(if kani::any() { 0 } else { 1 });

    let requested: u32 = kani::any();
    kani::assume(requested <= 8);
    let _ = ledger.try_allocate(resource, task, requested);
    kani::assert(ledger.is_conserved(), "allocation preserves units");

    let released: u32 = kani::any();
    kani::assume(released <= 8);
    let _ = ledger.release(resource, task, released);
    kani::assert(ledger.is_conserved(), "release preserves units");

    let _ = ledger.reclaim_all(task);
    kani::assert(ledger.is_conserved(), "reclaim preserves units");
    kani::assert(
        ledger.available(resource) == Ok(capacity),
        "reclaim returns every unit the task held",
    );
}
