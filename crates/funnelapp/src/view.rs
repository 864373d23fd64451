//! # View Projection
//!
//! The presentation layer never reaches into the engine's slots. It sends
//! [`SelectionEvent`]s in and reads [`ViewSnapshot`]s out, either by polling the
//! engine after each event or by registering a [`ViewListener`].
//!
//! Both types are serde-friendly so a UI on the other side of a process or language
//! boundary can speak JSON:
//!
//! ```text
//! → {"field": "role", "values": ["Admin"]}
//! ← {"level": 1, "filtered": true, "assigned": [...], "options": [...], "visible": [...], "total": 8}
//! ```

use crate::model::{FilterableField, Priority, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// "The user's selection for `field` is now `values`", as raised by a UI.
///
/// `field` is left untyped: parsing it is the engine's job, and a bad name must be
/// reported rather than rejected at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub field: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl SelectionEvent {
    pub fn new<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// An applied-filter badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedFilter {
    pub field: FilterableField,
    pub priority: Priority,
    pub selected: BTreeSet<String>,
}

/// Selectable values for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOptions {
    pub field: FilterableField,
    pub values: Vec<String>,
}

/// Everything a renderer needs after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub level: usize,
    pub filtered: bool,
    pub assigned: Vec<AssignedFilter>,
    /// One entry per field, in [`FilterableField::ALL`] order.
    pub options: Vec<FieldOptions>,
    pub visible: Vec<Record>,
    pub total: usize,
}

impl ViewSnapshot {
    pub fn options_for(&self, field: FilterableField) -> &[String] {
        self.options
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.values.as_slice())
            .unwrap_or_default()
    }

    pub fn assigned_fields(&self) -> Vec<FilterableField> {
        self.assigned.iter().map(|filter| filter.field).collect()
    }
}

/// Receives a fresh snapshot after every engine mutation.
pub trait ViewListener {
    fn on_view_changed(&self, snapshot: &ViewSnapshot);
}

impl<F> ViewListener for F
where
    F: Fn(&ViewSnapshot),
{
    fn on_view_changed(&self, snapshot: &ViewSnapshot) {
        self(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserializes_without_values() {
        let event: SelectionEvent = serde_json::from_str(r#"{"field": "role"}"#).unwrap();
        assert_eq!(event, SelectionEvent::new("role", Vec::<String>::new()));
    }

    #[test]
    fn test_event_deserializes_values() {
        let event: SelectionEvent =
            serde_json::from_str(r#"{"field": "app", "values": ["Diablo", "Frogger"]}"#).unwrap();
        assert_eq!(event.field, "app");
        assert_eq!(event.values, vec!["Diablo", "Frogger"]);
    }

    #[test]
    fn test_snapshot_lookup_helpers() {
        let snapshot = ViewSnapshot {
            level: 1,
            filtered: true,
            assigned: vec![AssignedFilter {
                field: FilterableField::Role,
                priority: Priority::Primary,
                selected: ["Admin".to_string()].into_iter().collect(),
            }],
            options: vec![FieldOptions {
                field: FilterableField::Name,
                values: vec!["David".into()],
            }],
            visible: vec![],
            total: 0,
        };
        assert_eq!(snapshot.options_for(FilterableField::Name), ["David"]);
        assert!(snapshot.options_for(FilterableField::Role).is_empty());
        assert_eq!(snapshot.assigned_fields(), vec![FilterableField::Role]);
    }

    #[test]
    fn test_snapshot_serializes_priorities_lowercase() {
        let filter = AssignedFilter {
            field: FilterableField::ApplicationCode,
            priority: Priority::Secondary,
            selected: BTreeSet::new(),
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["priority"], "secondary");
        assert_eq!(json["field"], "applicationCode");
    }
}
