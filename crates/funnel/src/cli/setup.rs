use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "funnel",
    bin_name = "funnel",
    version,
    disable_help_subcommand = true,
    after_help = "Selections apply in the order given:\n  funnel filter -s role=Admin -s app=Diablo -s role=\n  (the last one clears Role, promoting Application to primary)"
)]
#[command(about = "Multi-level record filtering, in the terminal or behind a static page server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Configuration file (defaults to ./funnel.toml, then the global config)
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the entry pages and static assets
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Apply selections in order and print the resulting view
    #[command(alias = "f")]
    Filter {
        /// FIELD=V1,V2 selection; an empty value list clears the field
        #[arg(short, long = "select", value_name = "FIELD=VALUES")]
        selections: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Read JSON selection events from stdin, one per line, printing the view after each
    Replay {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the distinct values of a field across all records
    Options {
        /// name, role or app
        field: String,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// JSON file of records (defaults to the built-in sample set)
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Print the view as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_keeps_selection_order() {
        let cli = Cli::parse_from([
            "funnel", "filter", "-s", "role=Admin", "--select", "app=Diablo", "-s", "role=",
        ]);
        match cli.command {
            Commands::Filter { selections, .. } => {
                assert_eq!(selections, vec!["role=Admin", "app=Diablo", "role="]);
            }
            other => panic!("Expected filter, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["funnel", "serve", "--port", "9000", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000) }));
    }

    #[test]
    fn test_options_takes_a_field_and_data() {
        let cli = Cli::parse_from(["funnel", "options", "role", "--data", "records.json"]);
        match cli.command {
            Commands::Options { field, source } => {
                assert_eq!(field, "role");
                assert_eq!(source.data, Some(PathBuf::from("records.json")));
            }
            other => panic!("Expected options, got {:?}", other),
        }
    }
}
