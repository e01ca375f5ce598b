//! Storage API: records and layers.

use serde_json::{json, Value};

use super::context::validated_point;
use super::Client;
use crate::coord::is_valid_ip;
use crate::error::{Error, Result};
use crate::http::{Body, HttpTransport, Method, QueryParams};
use crate::models::{Layer, ModelError, Record};

/// Where a nearby query is centered.
#[derive(Debug, Clone, PartialEq)]
pub enum NearbyTarget {
    Point { lat: f64, lon: f64 },
    Geohash(String),
    /// The location the server derives from an IP address
    IpAddress(String),
}

impl NearbyTarget {
    fn path_arg(&self) -> Result<String> {
        match self {
            NearbyTarget::Point { lat, lon } => {
                let (lat, lon) = validated_point(*lat, *lon)?;
                Ok(format!("{},{}", lat, lon))
            }
            NearbyTarget::Geohash(hash) => {
                if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(Error::invalid_argument(format!(
                        "not a valid geohash: {:?}",
                        hash
                    )));
                }
                Ok(hash.clone())
            }
            NearbyTarget::IpAddress(ip) => {
                if !is_valid_ip(ip) {
                    return Err(Error::invalid_argument(format!(
                        "not a valid IP address: {:?}",
                        ip
                    )));
                }
                Ok(ip.clone())
            }
        }
    }
}

/// Optional filters for [`StorageApi::get_nearby`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearbyOptions {
    /// Search radius in kilometers
    pub radius: Option<f64>,
    pub limit: Option<u32>,
}

/// Storage endpoints, borrowed from a [`Client`].
pub struct StorageApi<'a, T: HttpTransport> {
    client: &'a Client<T>,
}

impl<'a, T: HttpTransport> StorageApi<'a, T> {
    pub(super) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Stores a record, replacing any record with the same layer and id.
    pub fn add_record(&self, record: &Record) -> Result<()> {
        let url = self
            .client
            .endpoint("record", &[("layer", record.layer()), ("id", record.id())])?;
        self.client
            .request(&url, Method::Put, Body::Json(record.to_json()))?;
        Ok(())
    }

    /// Stores a batch of records in one request.
    ///
    /// Every record must belong to `layer`. The server caps the batch size
    /// and rejects larger batches with an [`ApiError`](crate::ApiError).
    pub fn add_records(&self, layer: &str, records: &[Record]) -> Result<()> {
        if let Some(stray) = records.iter().find(|r| r.layer() != layer) {
            return Err(Error::invalid_argument(format!(
                "record {:?} belongs to layer {:?}, not {:?}",
                stray.id(),
                stray.layer(),
                layer
            )));
        }

        let features: Vec<Value> = records.iter().map(Record::to_dict).collect();
        let collection = json!({ "type": "FeatureCollection", "features": features });
        let url = self.client.endpoint("add_records", &[("layer", layer)])?;
        self.client
            .request(&url, Method::Post, Body::json(&collection))?;
        Ok(())
    }

    /// Deletes a record.
    ///
    /// # Arguments
    ///
    /// * `layer` - Layer the record lives in
    /// * `id` - Record id within the layer
    ///
    /// # Returns
    ///
    /// `Ok(())` once the server accepts the deletion. Neither argument may be
    /// empty, `.` or `..`; such values fail before any request is sent.
    pub fn delete_record(&self, layer: &str, id: &str) -> Result<()> {
        let url = self
            .client
            .endpoint("record", &[("layer", layer), ("id", id)])?;
        self.client.request(&url, Method::Delete, Body::Empty)?;
        Ok(())
    }

    /// Fetches one record.
    ///
    /// # Arguments
    ///
    /// * `layer` - Layer the record lives in
    /// * `id` - Record id within the layer
    ///
    /// # Returns
    ///
    /// The record, or `None` when the server answers with a `null` or
    /// empty body. A missing record is a 404 [`ApiError`](crate::ApiError).
    pub fn get_record(&self, layer: &str, id: &str) -> Result<Option<Record>> {
        let url = self
            .client
            .endpoint("record", &[("layer", layer), ("id", id)])?;
        let value = self.client.request_json(&url, Method::Get, Body::Empty)?;
        Ok(Record::from_dict(&value)?)
    }

    /// Fetches several records from one layer in one request.
    pub fn get_records<S: AsRef<str>>(&self, layer: &str, ids: &[S]) -> Result<Vec<Record>> {
        if ids.is_empty() {
            return Err(Error::invalid_argument("at least one record id is required"));
        }
        let ids = ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let url = self
            .client
            .endpoint("records", &[("layer", layer), ("ids", &ids)])?;
        let collection = self.client.request_json(&url, Method::Get, Body::Empty)?;
        records_from_collection(&collection)
    }

    /// Past positions of a record.
    pub fn get_history(&self, layer: &str, id: &str, limit: Option<u32>) -> Result<Value> {
        let url = self
            .client
            .endpoint("history", &[("layer", layer), ("id", id)])?;
        let params = QueryParams::new().with_opt("limit", limit);
        self.client.request_json(&url, Method::Get, params.into())
    }

    /// Records in `layer` near a point, geohash or IP address.
    pub fn get_nearby(
        &self,
        layer: &str,
        target: &NearbyTarget,
        options: &NearbyOptions,
    ) -> Result<Value> {
        if let Some(radius) = options.radius {
            if !radius.is_finite() || radius < 0.0 {
                return Err(Error::invalid_argument(format!(
                    "radius must be a non-negative number of kilometers, not: {}",
                    radius
                )));
            }
        }
        let arg = target.path_arg()?;
        let url = self
            .client
            .endpoint("nearby", &[("layer", layer), ("arg", &arg)])?;
        let params = QueryParams::new()
            .with_opt("radius", options.radius)
            .with_opt("limit", options.limit);
        self.client.request_json(&url, Method::Get, params.into())
    }

    /// Creates a layer. The server treats this the same as an update.
    pub fn create_layer(&self, layer: &Layer) -> Result<Value> {
        self.put_layer(layer)
    }

    /// Replaces a layer's title, description, visibility and callbacks.
    pub fn update_layer(&self, layer: &Layer) -> Result<Value> {
        self.put_layer(layer)
    }

    /// Deletes a layer and the records in it.
    pub fn delete_layer(&self, name: &str) -> Result<Value> {
        let url = self.client.endpoint("layer", &[("layer", name)])?;
        self.client.request_json(&url, Method::Delete, Body::Empty)
    }

    /// Fetches one layer; `None` for a `null` body.
    pub fn get_layer(&self, name: &str) -> Result<Option<Layer>> {
        let url = self.client.endpoint("layer", &[("layer", name)])?;
        let value = self.client.request_json(&url, Method::Get, Body::Empty)?;
        Ok(Layer::from_dict(&value)?)
    }

    /// All layers owned by the account.
    pub fn get_layers(&self) -> Result<Vec<Layer>> {
        let url = self.client.endpoint("layers", &[])?;
        let value = self.client.request_json(&url, Method::Get, Body::Empty)?;
        let layers = value
            .get("layers")
            .ok_or(ModelError::MissingField("layers"))?
            .as_array()
            .ok_or_else(|| ModelError::wrong_type("layers", "an array", &value["layers"]))?;

        let mut decoded = Vec::with_capacity(layers.len());
        for entry in layers {
            if let Some(layer) = Layer::from_dict(entry)? {
                decoded.push(layer);
            }
        }
        Ok(decoded)
    }

    fn put_layer(&self, layer: &Layer) -> Result<Value> {
        if layer.name.is_empty() {
            return Err(Error::invalid_argument("layer name must not be empty"));
        }
        let url = self.client.endpoint("layer", &[("layer", &layer.name)])?;
        self.client
            .request_json(&url, Method::Put, Body::Json(layer.to_json()))
    }
}

/// Decodes the `features` array of a FeatureCollection of records.
pub(crate) fn records_from_collection(collection: &Value) -> Result<Vec<Record>> {
    let features = collection
        .get("features")
        .ok_or(ModelError::MissingField("features"))?
        .as_array()
        .ok_or_else(|| ModelError::wrong_type("features", "an array", &collection["features"]))?;

    let mut records = Vec::with_capacity(features.len());
    for value in features {
        if let Some(record) = Record::from_dict(value)? {
            records.push(record);
        }
    }
    Ok(records)
}
