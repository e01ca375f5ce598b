//! Storage CLI commands: records and layers.

use clap::Subcommand;
use serde_json::Value;
use simplegeo::{Degrees, Layer, NearbyOptions, NearbyTarget, Record};

use super::common::parse_property;
use crate::error::CliError;
use crate::runner::{print_json, CliRunner};

/// Record subcommands.
#[derive(Debug, Subcommand)]
pub enum RecordAction {
    /// Fetch a record
    Get { layer: String, id: String },

    /// Store a record, replacing any record with the same id
    Put {
        layer: String,
        id: String,

        /// Latitude, kept exactly as written
        #[arg(long, allow_negative_numbers = true)]
        lat: Degrees,

        /// Longitude, kept exactly as written
        #[arg(long, allow_negative_numbers = true)]
        lon: Degrees,

        /// Record type (default: object)
        #[arg(long = "type")]
        record_type: Option<String>,

        /// Extra property as key=value (repeatable)
        #[arg(short, long = "property", value_parser = parse_property)]
        properties: Vec<(String, Value)>,
    },

    /// Delete a record
    Delete { layer: String, id: String },

    /// Show past positions of a record
    History {
        layer: String,
        id: String,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Find records near a point, geohash or IP address
    Nearby {
        layer: String,

        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        geohash: Option<String>,

        /// IP address to search around
        #[arg(long, conflicts_with_all = ["lat", "lon", "geohash"])]
        ip: Option<String>,

        /// Search radius in kilometers
        #[arg(long)]
        radius: Option<f64>,

        #[arg(long)]
        limit: Option<u32>,
    },
}

/// Layer subcommands.
#[derive(Debug, Subcommand)]
pub enum LayerAction {
    /// Fetch a layer
    Get { name: String },

    /// List all layers
    List,

    /// Create or update a layer
    Put {
        name: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Make the layer publicly readable
        #[arg(long)]
        public: bool,

        /// Callback URL notified on record changes (repeatable)
        #[arg(long = "callback-url")]
        callback_urls: Vec<String>,
    },

    /// Delete a layer
    Delete { name: String },
}

/// Run a record subcommand.
pub fn run_record(action: RecordAction, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("record");
    let client = runner.create_client()?;
    let storage = client.storage();

    match action {
        RecordAction::Get { layer, id } => match storage.get_record(&layer, &id)? {
            Some(record) => print_json(&record),
            None => {
                println!("(no record)");
                Ok(())
            }
        },
        RecordAction::Put {
            layer,
            id,
            lat,
            lon,
            record_type,
            properties,
        } => {
            let record = build_record(layer, id, lat, lon, record_type, properties)?;
            storage.add_record(&record)?;
            println!("Stored {} in {}", record.id(), record.layer());
            Ok(())
        }
        RecordAction::Delete { layer, id } => {
            storage.delete_record(&layer, &id)?;
            println!("Deleted {} from {}", id, layer);
            Ok(())
        }
        RecordAction::History { layer, id, limit } => {
            print_json(&storage.get_history(&layer, &id, limit)?)
        }
        RecordAction::Nearby {
            layer,
            lat,
            lon,
            geohash,
            ip,
            radius,
            limit,
        } => {
            let target = nearby_target(lat, lon, geohash, ip)?;
            let options = NearbyOptions { radius, limit };
            print_json(&storage.get_nearby(&layer, &target, &options)?)
        }
    }
}

/// Run a layer subcommand.
pub fn run_layer(action: LayerAction, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("layer");
    let client = runner.create_client()?;
    let storage = client.storage();

    match action {
        LayerAction::Get { name } => match storage.get_layer(&name)? {
            Some(layer) => print_json(&layer),
            None => {
                println!("(no layer)");
                Ok(())
            }
        },
        LayerAction::List => {
            for layer in storage.get_layers()? {
                println!("{:<40} {}", layer.name, layer.title);
            }
            Ok(())
        }
        LayerAction::Put {
            name,
            title,
            description,
            public,
            callback_urls,
        } => {
            let layer = Layer::new(name)
                .with_title(title.unwrap_or_default())
                .with_description(description.unwrap_or_default())
                .with_public(public)
                .with_callback_urls(callback_urls);
            storage.update_layer(&layer)?;
            println!("Stored layer {}", layer.name);
            Ok(())
        }
        LayerAction::Delete { name } => {
            storage.delete_layer(&name)?;
            println!("Deleted layer {}", name);
            Ok(())
        }
    }
}

fn nearby_target(
    lat: Option<f64>,
    lon: Option<f64>,
    geohash: Option<String>,
    ip: Option<String>,
) -> Result<NearbyTarget, CliError> {
    match (lat, lon, geohash, ip) {
        (Some(lat), Some(lon), None, None) => Ok(NearbyTarget::Point { lat, lon }),
        (None, None, Some(hash), None) => Ok(NearbyTarget::Geohash(hash)),
        (None, None, None, Some(ip)) => Ok(NearbyTarget::IpAddress(ip)),
        _ => Err(CliError::InvalidInput(
            "give exactly one of --lat/--lon, --geohash or --ip".to_string(),
        )),
    }
}

fn build_record(
    layer: String,
    id: String,
    lat: Degrees,
    lon: Degrees,
    record_type: Option<String>,
    properties: Vec<(String, Value)>,
) -> Result<Record, CliError> {
    let mut record = Record::new(layer, id, lat, lon)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    if let Some(record_type) = record_type {
        record = record.with_type(record_type);
    }
    for (key, value) in properties {
        record
            .insert_property(key, value)
            .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    }
    Ok(record)
}
