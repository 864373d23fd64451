//! # Funnel Architecture
//!
//! Funnel is a **UI-agnostic filtering engine**. A user narrows a record set by
//! picking values for up to three fields, in whatever order they like, and can take
//! any of those picks back without the others falling out of step. The browser page,
//! the terminal client and the tests all drive the same engine.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Presentation (the funnel binary, a web page, tests)        │
//! │  - Sends SelectionEvents, renders ViewSnapshots             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (engine.rs, view.rs)                                │
//! │  - Parses events, runs the recompute pipeline               │
//! │  - Publishes snapshots to listeners                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (slots.rs, evaluator.rs, index.rs)                    │
//! │  - Slot promotion / retraction, filtering, option lists     │
//! │  - Pure functions over Rust types                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - RecordProvider trait, immutable RecordStore              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O in the Core
//!
//! From the engine inward, code never writes to stdout/stderr and never assumes a
//! terminal or a network. Providers are the only place records are read from disk.
//!
//! ## Module Overview
//!
//! - [`model`]: `Record`, `FilterableField`, `Priority`
//! - [`store`]: record providers and the read-only store
//! - [`slots`]: the three-slot funnel state machine
//! - [`evaluator`]: applying slots to the store
//! - [`index`]: per-field option lists
//! - [`engine`]: the facade presentation layers talk to
//! - [`view`]: events in, snapshots out
//! - [`config`]: layered configuration for the asset server
//! - [`error`]: the crate error type

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod index;
pub mod model;
pub mod slots;
pub mod store;
pub mod view;

pub use engine::FilterEngine;
pub use error::{FunnelError, Result};
pub use model::{FilterableField, Priority, Record};
