//! # Dispatch
//!
//! `run()` parses arguments, installs the tracing subscriber, then hands off to one
//! function per subcommand. Engine errors come back as [`FunnelError`] and are
//! wrapped with `anyhow` context on the way out.

use super::render::{render_json, render_values, render_view};
use super::setup::{Cli, Commands, OutputArgs, SourceArgs};
use crate::server;
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use funnelapp::config::FunnelConfig;
use funnelapp::index::distinct_values;
use funnelapp::store::cross::CrossProductProvider;
use funnelapp::store::json::JsonFileProvider;
use funnelapp::view::{SelectionEvent, ViewSnapshot};
use funnelapp::{FilterEngine, FilterableField, FunnelError};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { port } => handle_serve(cli.config.as_deref(), port),
        Commands::Filter {
            selections,
            source,
            output,
        } => handle_filter(&source, &selections, output),
        Commands::Replay { source, output } => {
            let stdin = std::io::stdin();
            handle_replay(&source, stdin.lock(), output)
        }
        Commands::Options { field, source } => handle_options(&source, &field),
    }
}

/// Logs go to stderr so stdout stays clean for tables and JSON.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_engine(source: &SourceArgs) -> Result<FilterEngine> {
    let engine = match &source.data {
        Some(path) => FilterEngine::from_provider(&JsonFileProvider::new(path))
            .with_context(|| format!("Failed to load records from {}", path.display()))?,
        None => FilterEngine::from_provider(&CrossProductProvider::sample())?,
    };
    debug!(records = engine.store().len(), "engine ready");
    Ok(engine)
}

fn handle_serve(config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let mut config = FunnelConfig::load(&cwd, config_path)?.rooted_at(&cwd);
    if let Some(port) = port {
        config.port = port;
    }
    info!(dist = %config.dist_dir.display(), assets = %config.assets_dir.display(), "serving");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    runtime.block_on(server::serve(config))
}

/// Split `role=Admin,User` into an event. `role=` clears the field.
pub(crate) fn parse_selection(raw: &str) -> Result<SelectionEvent> {
    let (field, values) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected FIELD=VALUES, got '{}'", raw))?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty());
    Ok(SelectionEvent::new(field.trim(), values))
}

fn handle_filter(source: &SourceArgs, selections: &[String], output: OutputArgs) -> Result<()> {
    let mut engine = load_engine(source)?;
    for raw in selections {
        let event = parse_selection(raw)?;
        let change = engine.apply_event(&event)?;
        debug!(?change, selection = %raw, "applied");
    }

    let snapshot = engine.snapshot();
    let text = if output.json {
        render_json(&snapshot, true)?
    } else {
        render_view(&snapshot)
    };
    println!("{}", text.trim_end());
    Ok(())
}

/// Apply newline-delimited JSON events, printing the view after each accepted one.
///
/// Bad lines and unknown fields are reported on stderr and skipped; an invariant
/// breach inside the engine ends the run with an error.
pub(crate) fn handle_replay<R: BufRead>(source: &SourceArgs, input: R, output: OutputArgs) -> Result<()> {
    let mut engine = load_engine(source)?;
    engine.subscribe(move |snapshot: &ViewSnapshot| print_snapshot(snapshot, output));

    let mut applied = 0usize;
    let mut skipped = 0usize;
    for (number, line) in input.lines().enumerate() {
        let line = line.context("Failed to read events from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: SelectionEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(err) => {
                warn!(line = number + 1, error = %err, "skipping malformed event");
                skipped += 1;
                continue;
            }
        };
        match engine.apply_event(&event) {
            Ok(_) => applied += 1,
            Err(err) if err.is_fatal() => {
                return Err(err).with_context(|| format!("Event on line {} broke the engine", number + 1));
            }
            Err(err) => {
                eprintln!("line {}: {}", number + 1, err);
                skipped += 1;
            }
        }
    }
    info!(applied, skipped, "replay finished");
    Ok(())
}

fn print_snapshot(snapshot: &ViewSnapshot, output: OutputArgs) {
    let text = if output.json {
        match render_json(snapshot, false) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to serialize view");
                return;
            }
        }
    } else {
        render_view(snapshot)
    };
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = writeln!(stdout, "{}", text.trim_end()) {
        debug!(error = %err, "stdout closed");
    }
}

fn handle_options(source: &SourceArgs, field: &str) -> Result<()> {
    let field: FilterableField = field.parse().map_err(|err: FunnelError| {
        anyhow!("{} (expected one of: name, role, app)", err)
    })?;
    let engine = load_engine(source)?;
    let values = distinct_values(field, engine.store().records());
    if values.is_empty() {
        bail!("No records loaded");
    }
    print!("{}", render_values(&values));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_selection_splits_values() {
        assert_eq!(
            parse_selection("role=Admin, User").unwrap(),
            SelectionEvent::new("role", ["Admin", "User"])
        );
    }

    #[test]
    fn test_empty_selection_clears() {
        assert_eq!(
            parse_selection("app=").unwrap(),
            SelectionEvent::new("app", Vec::<String>::new())
        );
    }

    #[test]
    fn test_selection_without_equals_is_rejected() {
        assert!(parse_selection("role").is_err());
    }

    #[test]
    fn test_replay_skips_bad_lines() {
        let input = "{\"field\": \"role\", \"values\": [\"Admin\"]}\nnot json\n\n{\"field\": \"colour\"}\n";
        let result = handle_replay(
            &SourceArgs::default(),
            input.as_bytes(),
            OutputArgs { json: true },
        );
        assert!(result.is_ok());
    }
}
