//! # Funnel CLI
//!
//! The binary is thin: argument parsing, logging setup and output formatting live
//! in `src/cli/`, the static page server in `src/server.rs`, and every filtering
//! decision is made by the `funnelapp` library.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/funnel/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Tracing setup + dispatch (commands.rs)                   │
//! │  - Tables and JSON output (render.rs)                       │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                       │
//!          ▼                                       ▼
//! ┌──────────────────────────────┐   ┌──────────────────────────┐
//! │  funnelapp::FilterEngine     │   │  server.rs (axum)        │
//! │  - Slots, stages, options    │   │  - `/`, `/filtering`     │
//! └──────────────────────────────┘   │  - dist + asset lookup   │
//!                                    └──────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - **Library**: the engine, slot machine and providers are tested in `funnelapp`.
//! - **CLI**: clap definitions and rendering are unit tested here; `tests/cli_e2e.rs`
//!   runs the built binary end to end.
//! - **Server**: handlers are called directly from `#[tokio::test]` functions
//!   against temporary asset directories.

mod cli;
mod server;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
