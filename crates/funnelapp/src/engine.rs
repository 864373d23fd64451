//! # Filter Engine
//!
//! [`FilterEngine`] is the single entry point a presentation layer talks to. It owns
//! the immutable [`RecordStore`], the [`SlotChain`], and everything derived from them.
//!
//! ## The Recompute Pipeline
//!
//! Derived state is never edited directly. After every mutating call the engine runs
//! the same synchronous pipeline, in this order:
//!
//! 1. **Evaluate**: rebuild the evaluator's stage list from the slot chain.
//! 2. **Slot options**: give every slot the distinct values over the stage just below
//!    it. A slot that shifted priority therefore gets a fresh option list.
//! 3. **Free options**: every unassigned field draws from the final stage, the
//!    filtered view.
//! 4. **Notify**: build a [`ViewSnapshot`] and hand it to each listener.
//!
//! Options are therefore always computed from the *post*-mutation view.
//!
//! ## Errors
//!
//! - [`FunnelError::InvalidField`] comes from malformed events and leaves the engine
//!   untouched.
//! - [`FunnelError::CapacityExceeded`] and [`FunnelError::InconsistentSlotState`]
//!   mean the engine itself is broken. They are logged, trip a debug assertion, and
//!   are returned without applying the mutation.
//!
//! ## Concurrency
//!
//! None. Events are applied one at a time and each call runs to completion. Wrap the
//! engine in a lock if it must be shared.

use crate::error::{FunnelError, Result};
use crate::evaluator;
use crate::index;
use crate::model::{FilterableField, Priority, Record};
use crate::slots::{SlotChain, SlotChange};
use crate::store::{RecordProvider, RecordStore};
use crate::view::{AssignedFilter, FieldOptions, SelectionEvent, ViewListener, ViewSnapshot};
use std::collections::BTreeSet;

pub struct FilterEngine {
    store: RecordStore,
    slots: SlotChain,
    stages: Vec<Vec<usize>>,
    options: [Vec<String>; 3],
    listeners: Vec<Box<dyn ViewListener>>,
}

impl FilterEngine {
    pub fn new(store: RecordStore) -> Self {
        let mut engine = Self {
            store,
            slots: SlotChain::default(),
            stages: Vec::new(),
            options: Default::default(),
            listeners: Vec::new(),
        };
        engine.recompute();
        engine
    }

    pub fn from_provider(provider: &dyn RecordProvider) -> Result<Self> {
        Ok(Self::new(RecordStore::from_provider(provider)?))
    }

    /// Register a listener, called after every mutation with the new snapshot.
    pub fn subscribe(&mut self, listener: impl ViewListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// The user's selection for `field` is now `values`.
    ///
    /// Empty `values` retracts the field's slot, non-empty values either open a slot
    /// at the next free priority or replace the selection of the existing one.
    pub fn update_selection<I, S>(&mut self, field: FilterableField, values: I) -> Result<SlotChange>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        let change = self.slots.apply_selection(field, values).map_err(fatal)?;
        self.publish();
        Ok(change)
    }

    /// Apply an untyped event from the presentation layer.
    pub fn apply_event(&mut self, event: &SelectionEvent) -> Result<SlotChange> {
        let field = match event.field.parse::<FilterableField>() {
            Ok(field) => field,
            Err(err) => {
                tracing::warn!(field = %event.field, "ignoring selection event for unknown field");
                return Err(err);
            }
        };
        self.update_selection(field, event.values.iter().cloned())
    }

    /// Remove `field`'s slot, shifting higher-priority slots down.
    pub fn retract(&mut self, field: FilterableField) -> Result<SlotChange> {
        let change = self.slots.retract(field).map_err(fatal)?;
        self.publish();
        Ok(change)
    }

    /// Remove every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.publish();
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn slots(&self) -> &SlotChain {
        &self.slots
    }

    pub fn current_visible_records(&self) -> Vec<Record> {
        evaluator::collect(&self.store, self.view_positions())
    }

    pub fn visible_count(&self) -> usize {
        self.view_positions().len()
    }

    /// Sorted selectable values for `field`.
    pub fn current_options(&self, field: FilterableField) -> &[String] {
        &self.options[field_slot(field)]
    }

    /// Assigned fields, primary first.
    pub fn current_assigned_fields(&self) -> Vec<FilterableField> {
        self.slots.fields()
    }

    pub fn current_filter_level(&self) -> usize {
        self.slots.level()
    }

    pub fn is_filtered(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn priority_of(&self, field: FilterableField) -> Option<Priority> {
        self.slots.priority_of(field)
    }

    /// Values currently chosen for `field`; empty when the field is unassigned.
    pub fn selection(&self, field: FilterableField) -> BTreeSet<String> {
        self.slots
            .slot_for(field)
            .map(|slot| slot.selected.clone())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            level: self.current_filter_level(),
            filtered: self.is_filtered(),
            assigned: self
                .slots
                .iter()
                .map(|slot| AssignedFilter {
                    field: slot.field,
                    priority: slot.priority,
                    selected: slot.selected.clone(),
                })
                .collect(),
            options: FilterableField::ALL
                .iter()
                .map(|&field| FieldOptions {
                    field,
                    values: self.current_options(field).to_vec(),
                })
                .collect(),
            visible: self.current_visible_records(),
            total: self.store.len(),
        }
    }

    fn view_positions(&self) -> &[usize] {
        self.stages.last().map(Vec::as_slice).unwrap_or_default()
    }

    fn publish(&mut self) {
        self.recompute();
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in &self.listeners {
            listener.on_view_changed(&snapshot);
        }
    }

    fn recompute(&mut self) {
        self.stages = evaluator::stages(&self.slots, &self.store);

        let refreshed: Vec<(Priority, Vec<String>)> = self
            .slots
            .iter()
            .map(|slot| {
                let corpus = &self.stages[slot.priority.index()];
                (
                    slot.priority,
                    index::distinct_values_at(&self.store, slot.field, corpus),
                )
            })
            .collect();
        for (priority, options) in refreshed {
            self.slots.set_source_options(priority, options);
        }

        for field in FilterableField::ALL {
            self.options[field_slot(field)] = match self.slots.slot_for(field) {
                Some(slot) => slot.source_options.clone(),
                None => index::options_for(&self.store, field, &self.slots, &self.stages),
            };
        }

        tracing::trace!(
            level = self.slots.level(),
            visible = self.visible_count(),
            "view recomputed"
        );
    }
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("records", &self.store.len())
            .field("slots", &self.slots)
            .field("visible", &self.visible_count())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn field_slot(field: FilterableField) -> usize {
    match field {
        FilterableField::Name => 0,
        FilterableField::Role => 1,
        FilterableField::ApplicationCode => 2,
    }
}

fn fatal(err: FunnelError) -> FunnelError {
    if err.is_fatal() {
        tracing::error!(error = %err, "filter slot invariant violated");
        debug_assert!(false, "{err}");
    }
    err
}
