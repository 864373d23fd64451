//! # Record Storage
//!
//! The [`RecordStore`] holds the full record set the engine filters. It is populated
//! exactly once, from a [`RecordProvider`], and is immutable afterwards: every filter
//! result and option list is a pure derivation over it.
//!
//! ## Providers
//!
//! The store does not care where records come from. A provider is anything that can
//! produce a `Vec<Record>`:
//!
//! - [`cross::CrossProductProvider`]: every combination of a list of names, roles and
//!   application codes. [`cross::CrossProductProvider::sample`] is the demo data set.
//! - [`json::JsonFileProvider`]: a JSON array of records on disk.
//!
//! ## Sharing
//!
//! Records live behind an `Arc<[Record]>`, so cloning a store is cheap and every
//! derivation can borrow from the same allocation.

use crate::error::Result;
use crate::model::Record;
use std::sync::Arc;

pub mod cross;
pub mod json;

/// Source of the initial record set.
pub trait RecordProvider {
    /// Produce every record the store should hold, in display order.
    fn load(&self) -> Result<Vec<Record>>;
}

/// Read-only, shareable record set.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[Record]>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn from_provider(provider: &dyn RecordProvider) -> Result<Self> {
        let records = provider.load()?;
        tracing::debug!(count = records.len(), "record store populated");
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::cross::CrossProductProvider;
    use super::*;

    /// The eight-record store used throughout the scenario tests:
    /// names `David, Joe` × roles `User, Admin` × apps `Diablo, Frogger`.
    pub fn scenario_store() -> RecordStore {
        let provider = CrossProductProvider::new(
            ["David", "Joe"],
            ["User", "Admin"],
            ["Diablo", "Frogger"],
        );
        RecordStore::from_provider(&provider).unwrap()
    }

    /// The full 64-record demo store.
    pub fn sample_store() -> RecordStore {
        RecordStore::from_provider(&CrossProductProvider::sample()).unwrap()
    }
}
