//! # Domain Model: Records, Fields and Priorities
//!
//! This module defines the three value types every other layer works with:
//! [`Record`], [`FilterableField`] and [`Priority`].
//!
//! ## Records
//!
//! A record is an immutable `(name, role, applicationCode)` triple. Records have no
//! identity of their own; two records with the same three values are
//! indistinguishable for filtering purposes. Serialized records use camelCase keys so
//! the same JSON shape can be fed in by a data provider and rendered back out:
//!
//! ```text
//! { "name": "David", "role": "Admin", "applicationCode": "Diablo" }
//! ```
//!
//! ## Field Extraction
//!
//! Each [`FilterableField`] knows how to read its value off a record through
//! [`FilterableField::value_of`]. This is a plain `match`: fields are never looked up
//! by building a string and resolving it at runtime.
//!
//! ## Parsing Field Names
//!
//! Presentation layers talk in strings. [`FilterableField`] implements `FromStr` and
//! accepts the spellings those layers use:
//!
//! | Field | Accepted (case-insensitive) |
//! |-------|-----------------------------|
//! | `Name` | `name`, `user` |
//! | `Role` | `role` |
//! | `ApplicationCode` | `applicationcode`, `application_code`, `application`, `app` |
//!
//! Anything else is rejected with [`FunnelError::InvalidField`].

use crate::error::FunnelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub name: String,
    pub role: String,
    pub application_code: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        application_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            application_code: application_code.into(),
        }
    }
}

/// One of the three fields a user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterableField {
    Name,
    Role,
    ApplicationCode,
}

impl FilterableField {
    /// Canonical field order, used wherever fields are listed.
    pub const ALL: [FilterableField; 3] = [
        FilterableField::Name,
        FilterableField::Role,
        FilterableField::ApplicationCode,
    ];

    /// Extract this field's value from a record.
    pub fn value_of(self, record: &Record) -> &str {
        match self {
            FilterableField::Name => &record.name,
            FilterableField::Role => &record.role,
            FilterableField::ApplicationCode => &record.application_code,
        }
    }

    /// Human-facing label, as shown on "applied filters" badges.
    pub fn label(self) -> &'static str {
        match self {
            FilterableField::Name => "Name",
            FilterableField::Role => "Role",
            FilterableField::ApplicationCode => "Application",
        }
    }
}

impl fmt::Display for FilterableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterableField {
    type Err = FunnelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "user" => Ok(FilterableField::Name),
            "role" => Ok(FilterableField::Role),
            "applicationcode" | "application_code" | "application" | "app" => {
                Ok(FilterableField::ApplicationCode)
            }
            _ => Err(FunnelError::InvalidField(s.to_string())),
        }
    }
}

/// Order in which occupied slots narrow the record set. Primary is applied first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Primary,
    Secondary,
    Tertiary,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Primary, Priority::Secondary, Priority::Tertiary];

    /// Priority for a zero-based slot position, if there is one.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Zero-based slot position.
    pub fn index(self) -> usize {
        match self {
            Priority::Primary => 0,
            Priority::Secondary => 1,
            Priority::Tertiary => 2,
        }
    }

    /// One-based level: a machine whose highest slot is `p` is at level `p.ordinal()`.
    pub fn ordinal(self) -> usize {
        self.index() + 1
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Primary => write!(f, "primary"),
            Priority::Secondary => write!(f, "secondary"),
            Priority::Tertiary => write!(f, "tertiary"),
        }
    }
}
