//! SimpleGeo CLI - Command-line interface
//!
//! This binary provides a command-line interface to the SimpleGeo library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::common::LocationArgs;
use commands::config::ConfigCommands;
use commands::places::{FeatureAction, SearchArgs};
use commands::storage::{LayerAction, RecordAction};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "simplegeo")]
#[command(version = simplegeo::VERSION)]
#[command(about = "Query the SimpleGeo Context, Places and Storage APIs", long_about = None)]
struct Cli {
    /// Enable debug logging and mirror log output to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Describe a location (defaults to the caller's IP address)
    Context(LocationArgs),

    /// Search Places near a location (defaults to the caller's IP address)
    Search(SearchArgs),

    /// Fetch, inspect or delete a Places feature
    Feature {
        #[command(subcommand)]
        action: FeatureAction,
    },

    /// Manage stored records
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Manage storage layers
    Layer {
        #[command(subcommand)]
        action: LayerAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let debug = cli.debug;
    match cli.command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Context(location) => commands::context::run(location, debug),
        Commands::Search(args) => commands::places::run_search(args, debug),
        Commands::Feature { action } => commands::places::run_feature(action, debug),
        Commands::Record { action } => commands::storage::run_record(action, debug),
        Commands::Layer { action } => commands::storage::run_layer(action, debug),
    }
}
