//! SimpleGeo - Client library for the SimpleGeo location APIs
//!
//! This library talks to the SimpleGeo Context, Places and Storage services
//! over OAuth-signed HTTP. It models stored points as [`Record`]s, Places
//! entries as [`Feature`]s and storage containers as [`Layer`]s, and moves
//! coordinates between the (latitude, longitude) order used in these models
//! and the (longitude, latitude) order of GeoJSON on the wire.
//!
//! # High-Level API
//!
//! ```ignore
//! use simplegeo::{Client, Record};
//!
//! let client = Client::new("key", "secret")?;
//! let record = Record::new("com.example.layer", "42", "37.80".parse()?, "-122.47".parse()?)?;
//! client.storage().add_record(&record)?;
//!
//! let nearby = client.places().search(37.80, -122.47, &Default::default())?;
//! ```

pub mod client;
pub mod config;
pub mod coord;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;

pub use client::{
    AsyncClient, Client, ClientConfig, ContextApi, NearbyOptions, NearbyTarget, PlacesApi,
    SearchOptions, StorageApi,
};
pub use coord::{CoordError, Coordinates, Degrees};
pub use error::{ApiError, DecodeError, Error, Result};
pub use models::{Feature, FeatureBuilder, Handle, Layer, ModelError, Record};

/// Version of the SimpleGeo library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
