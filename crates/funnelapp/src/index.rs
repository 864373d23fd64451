//! # Field Index: Selectable Options
//!
//! The options offered for a field are the distinct values that field takes across
//! some corpus of records, sorted ascending. Which corpus depends on where the field
//! sits in the filter funnel:
//!
//! - **No slots occupied**: every field draws from the whole store.
//! - **Field not assigned**: it draws from the current filtered view, i.e. the
//!   combined effect of every occupied slot. That is what it would filter next.
//! - **Field assigned at priority `p`**: it draws only from the records surviving
//!   the slots *below* `p`. A field never filters against a view its own selection
//!   already narrowed, otherwise picking a value would hide its siblings.
//!
//! Corpora are passed around as slices of record positions into the store, which is
//! how the evaluator's stage list describes them.

use crate::model::{FilterableField, Record};
use crate::slots::SlotChain;
use crate::store::RecordStore;
use std::collections::BTreeSet;

/// Distinct values of `field` over `records`, sorted ascending.
pub fn distinct_values<'a, I>(field: FilterableField, records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .map(|record| field.value_of(record))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Distinct values of `field` over the records at `positions` in `store`.
pub fn distinct_values_at(
    store: &RecordStore,
    field: FilterableField,
    positions: &[usize],
) -> Vec<String> {
    distinct_values(field, positions.iter().filter_map(|&i| store.get(i)))
}

/// Options for `field` given the occupied `slots` and the evaluator's `stages`.
///
/// `stages[i]` must be the record positions surviving slots `0..i`, so `stages[0]` is
/// the whole store and the last stage is the visible view.
pub fn options_for(
    store: &RecordStore,
    field: FilterableField,
    slots: &SlotChain,
    stages: &[Vec<usize>],
) -> Vec<String> {
    let corpus = match slots.priority_of(field) {
        Some(priority) => stages.get(priority.index()),
        None => stages.last(),
    };
    match corpus {
        Some(positions) => distinct_values_at(store, field, positions),
        None => distinct_values(field, store.records()),
    }
}
