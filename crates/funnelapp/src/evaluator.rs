//! Applies a slot chain to the record store.
//!
//! Slots are applied in ascending priority order, each one narrowing the working set
//! left by the one before it. [`stages`] keeps every intermediate working set so the
//! field index can ask "what did the slots below priority `p` let through?" without
//! re-running the chain.

use crate::model::Record;
use crate::slots::SlotChain;
use crate::store::RecordStore;

/// Record positions surviving each prefix of the chain.
///
/// The result always has `slots.level() + 1` entries: `stages[0]` is every position
/// in the store, `stages[i]` is what survives slots `0..i`, and the last entry is the
/// filtered view.
pub fn stages(slots: &SlotChain, store: &RecordStore) -> Vec<Vec<usize>> {
    let mut stages = Vec::with_capacity(slots.level() + 1);
    stages.push((0..store.len()).collect::<Vec<_>>());
    for slot in slots {
        let previous = stages.last().map(Vec::as_slice).unwrap_or_default();
        let next = previous
            .iter()
            .copied()
            .filter(|&i| {
                store
                    .get(i)
                    .is_some_and(|record| slot.accepts(slot.field.value_of(record)))
            })
            .collect();
        stages.push(next);
    }
    stages
}

/// The filtered view: records satisfying every occupied slot, in store order.
pub fn evaluate(slots: &SlotChain, store: &RecordStore) -> Vec<Record> {
    let stages = stages(slots, store);
    let view = stages.last().map(Vec::as_slice).unwrap_or_default();
    collect(store, view)
}

/// Materialize the records at `positions`.
pub fn collect(store: &RecordStore, positions: &[usize]) -> Vec<Record> {
    positions
        .iter()
        .filter_map(|&i| store.get(i).cloned())
        .collect()
}
