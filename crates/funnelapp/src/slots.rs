//! # Filter Slots: The Funnel State Machine
//!
//! Up to three fields can be filtered at once. Each active filter occupies a *slot*
//! at a [`Priority`], and slots narrow the record set in priority order: the primary
//! slot sees the whole store, the secondary sees what the primary let through, and so
//! on.
//!
//! ## Slot Assignment
//!
//! Priorities are handed out in the order fields *first* receive a non-empty
//! selection. There is no way to request a specific priority.
//!
//! ```text
//! select Role      → [Role]
//! select App       → [Role, App]
//! change Role      → [Role, App]        (selection updated in place)
//! clear Role       → [App]              (App shifts down to primary)
//! select Name      → [App, Name]
//! ```
//!
//! ## Representation
//!
//! A [`SlotChain`] is a vector of at most three [`FilterSlot`]s whose position *is*
//! the priority. Retracting a slot removes it from the vector and re-stamps the
//! priority of everything after it, so the occupied priorities are always a
//! contiguous prefix of `Primary, Secondary, Tertiary`.
//!
//! ## Invariants
//!
//! [`SlotChain::check_invariants`] verifies, before every mutation:
//!
//! - at most three slots
//! - each slot's stored priority matches its position
//! - no field holds more than one slot
//! - no slot has an empty selection (an empty selection means "no slot")
//!
//! A violation is a bug in the engine, never a user error, and is reported as
//! [`FunnelError::InconsistentSlotState`] without applying the mutation.

use crate::error::{FunnelError, Result};
use crate::model::{FilterableField, Priority};
use serde::Serialize;
use std::collections::BTreeSet;

/// Maximum number of simultaneously occupied slots.
pub const MAX_SLOTS: usize = Priority::ALL.len();

/// One active filter: a field bound to the set of values to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSlot {
    pub field: FilterableField,
    pub selected: BTreeSet<String>,
    pub priority: Priority,
    /// Sorted distinct values of `field` over the records surviving every slot of
    /// lower priority. This is the slot's own option list.
    pub source_options: Vec<String>,
}

impl FilterSlot {
    /// A detached slot. Its priority is assigned when it is pushed onto a chain.
    pub fn new(field: FilterableField, selected: BTreeSet<String>) -> Self {
        Self {
            field,
            selected,
            priority: Priority::Primary,
            source_options: Vec::new(),
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.selected.contains(value)
    }
}

/// What a selection change did to the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotChange {
    /// A new slot was created at this priority.
    Promoted(Priority),
    /// An existing slot's selection was replaced; its priority did not move.
    Updated(Priority),
    /// A slot was removed. `shifted` lists the fields that moved down one priority.
    Retracted {
        from: Priority,
        shifted: Vec<FilterableField>,
    },
    /// Nothing to do (empty selection for a field with no slot).
    Unchanged,
}

/// Ordered slots, indexed by priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotChain {
    slots: Vec<FilterSlot>,
}

impl SlotChain {
    /// Number of occupied slots, which is also the current filter level.
    pub fn level(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterSlot> {
        self.slots.iter()
    }

    pub fn as_slice(&self) -> &[FilterSlot] {
        &self.slots
    }

    pub fn get(&self, priority: Priority) -> Option<&FilterSlot> {
        self.slots.get(priority.index())
    }

    pub fn slot_for(&self, field: FilterableField) -> Option<&FilterSlot> {
        self.slots.iter().find(|slot| slot.field == field)
    }

    pub fn priority_of(&self, field: FilterableField) -> Option<Priority> {
        self.slot_for(field).map(|slot| slot.priority)
    }

    /// Assigned fields, highest precedence (primary) first.
    pub fn fields(&self) -> Vec<FilterableField> {
        self.slots.iter().map(|slot| slot.field).collect()
    }

    pub fn check_invariants(&self) -> Result<()> {
        if self.slots.len() > MAX_SLOTS {
            return Err(FunnelError::InconsistentSlotState(format!(
                "{} slots occupied, at most {} allowed",
                self.slots.len(),
                MAX_SLOTS
            )));
        }
        let mut seen = BTreeSet::new();
        for (position, slot) in self.slots.iter().enumerate() {
            if slot.priority.index() != position {
                return Err(FunnelError::InconsistentSlotState(format!(
                    "{} slot at position {} is stamped {}",
                    slot.field, position, slot.priority
                )));
            }
            if !seen.insert(slot.field) {
                return Err(FunnelError::InconsistentSlotState(format!(
                    "{} holds more than one slot",
                    slot.field
                )));
            }
            if slot.selected.is_empty() {
                return Err(FunnelError::InconsistentSlotState(format!(
                    "{} slot has an empty selection",
                    slot.field
                )));
            }
        }
        Ok(())
    }

    /// Route a selection change for `field` to promote, update or retract.
    pub fn apply_selection(
        &mut self,
        field: FilterableField,
        values: BTreeSet<String>,
    ) -> Result<SlotChange> {
        self.check_invariants()?;
        match (self.position_of(field), values.is_empty()) {
            (Some(_), true) => self.retract(field),
            (None, true) => Ok(SlotChange::Unchanged),
            (None, false) => self.push(FilterSlot::new(field, values)).map(SlotChange::Promoted),
            (Some(position), false) => {
                let slot = &mut self.slots[position];
                slot.selected = values;
                tracing::debug!(field = %field, priority = %slot.priority, "selection updated");
                Ok(SlotChange::Updated(slot.priority))
            }
        }
    }

    /// Occupy the next free priority with `slot`.
    ///
    /// A full chain is refused with [`FunnelError::CapacityExceeded`] before the
    /// incoming field is looked at.
    pub fn push(&mut self, mut slot: FilterSlot) -> Result<Priority> {
        self.check_invariants()?;
        let Some(priority) = Priority::from_index(self.slots.len()) else {
            return Err(FunnelError::CapacityExceeded(slot.field));
        };
        if self.position_of(slot.field).is_some() {
            return Err(FunnelError::InconsistentSlotState(format!(
                "{} already holds a slot",
                slot.field
            )));
        }
        if slot.selected.is_empty() {
            return Err(FunnelError::InconsistentSlotState(format!(
                "refusing to open an empty {} slot",
                slot.field
            )));
        }
        slot.priority = priority;
        tracing::debug!(field = %slot.field, priority = %priority, "slot promoted");
        self.slots.push(slot);
        Ok(priority)
    }

    /// Remove `field`'s slot, shifting every later slot down one priority.
    ///
    /// Retracting a field without a slot is a no-op.
    pub fn retract(&mut self, field: FilterableField) -> Result<SlotChange> {
        self.check_invariants()?;
        let Some(position) = self.position_of(field) else {
            return Ok(SlotChange::Unchanged);
        };
        let removed = self.slots.remove(position);
        let mut shifted = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate().skip(position) {
            // from_index cannot fail: the chain just shrank below MAX_SLOTS.
            if let Some(priority) = Priority::from_index(index) {
                slot.priority = priority;
            }
            shifted.push(slot.field);
        }
        tracing::debug!(
            field = %field,
            priority = %removed.priority,
            shifted = shifted.len(),
            "slot retracted"
        );
        Ok(SlotChange::Retracted {
            from: removed.priority,
            shifted,
        })
    }

    pub fn clear(&mut self) {
        if !self.slots.is_empty() {
            tracing::debug!(count = self.slots.len(), "all slots cleared");
        }
        self.slots.clear();
    }

    /// Replace the option list of the slot at `priority`.
    pub(crate) fn set_source_options(&mut self, priority: Priority, options: Vec<String>) {
        if let Some(slot) = self.slots.get_mut(priority.index()) {
            slot.source_options = options;
        }
    }

    fn position_of(&self, field: FilterableField) -> Option<usize> {
        self.slots.iter().position(|slot| slot.field == field)
    }

    #[cfg(test)]
    pub(crate) fn slots_mut(&mut self) -> &mut Vec<FilterSlot> {
        &mut self.slots
    }
}

impl<'a> IntoIterator for &'a SlotChain {
    type Item = &'a FilterSlot;
    type IntoIter = std::slice::Iter<'a, FilterSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
