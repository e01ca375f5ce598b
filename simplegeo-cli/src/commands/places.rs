//! Places CLI commands: search and feature lookup.

use clap::{Args, Subcommand};
use simplegeo::SearchOptions;

use super::common::{Location, LocationArgs};
use crate::error::CliError;
use crate::runner::{print_json, CliRunner};

/// Arguments for the search command.
#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Free-text query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Category filter
    #[arg(long)]
    pub category: Option<String>,

    /// Search radius in kilometers
    #[arg(long)]
    pub radius: Option<f64>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<u32>,

    /// Offset into the result list
    #[arg(long)]
    pub start: Option<u32>,
}

impl SearchArgs {
    fn options(&self) -> SearchOptions {
        SearchOptions {
            radius: self.radius,
            query: self.query.clone(),
            category: self.category.clone(),
            limit: self.limit,
            start: self.start,
        }
    }
}

/// Feature subcommands.
#[derive(Debug, Subcommand)]
pub enum FeatureAction {
    /// Fetch a feature by handle
    Get {
        /// Feature handle (SG_...)
        handle: String,
    },
    /// Show the annotations attached to a feature
    Annotations {
        /// Feature handle (SG_...)
        handle: String,
    },
    /// Delete a feature
    Delete {
        /// Feature handle (SG_...)
        handle: String,
    },
}

/// Run the search command.
pub fn run_search(args: SearchArgs, debug: bool) -> Result<(), CliError> {
    let location = args.location.resolve()?;
    let options = args.options();

    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("search");
    let client = runner.create_client()?;
    let places = client.places();

    let features = match location {
        Location::Point { lat, lon } => places.search(lat, lon, &options)?,
        Location::Ip(ip) => places.search_by_ip(&ip, &options)?,
        Location::Address(address) => places.search_by_address(&address, &options)?,
        Location::MyIp => places.search_by_my_ip(&options)?,
    };

    print_json(&features)
}

/// Run a feature subcommand.
pub fn run_feature(action: FeatureAction, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("feature");
    let client = runner.create_client()?;

    match action {
        FeatureAction::Get { handle } => print_json(&client.get_feature(&handle)?),
        FeatureAction::Annotations { handle } => print_json(&client.get_annotations(&handle)?),
        FeatureAction::Delete { handle } => {
            client.places().delete_feature(&handle)?;
            println!("Deleted {}", handle);
            Ok(())
        }
    }
}
