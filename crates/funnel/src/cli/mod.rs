//! # CLI Layer
//!
//! This module is **one possible UI client** for the funnel engine. It is the only
//! place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption

mod commands;
mod render;
pub mod setup;

pub use commands::run;
