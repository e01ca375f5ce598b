//! Places API: the shared feature database.

use serde_json::Value;
use tracing::warn;

use super::context::{non_empty_address, validated_point};
use super::Client;
use crate::coord::is_valid_ip;
use crate::error::{ApiError, Error, Result};
use crate::http::{Body, HttpTransport, Method, QueryParams};
use crate::models::{json_decode, Feature, Handle, ModelError};

/// Optional filters for the search calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Search radius in kilometers
    pub radius: Option<f64>,
    /// Free-text query, sent as `q`
    pub query: Option<String>,
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub start: Option<u32>,
}

impl SearchOptions {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search radius in kilometers.
    pub fn radius(mut self, km: f64) -> Self {
        self.radius = Some(km);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    /// Query parameters for the set options, in a fixed order.
    pub(crate) fn to_params(&self) -> Result<QueryParams> {
        if let Some(radius) = self.radius {
            if !radius.is_finite() || radius < 0.0 {
                return Err(Error::invalid_argument(format!(
                    "radius must be a non-negative number of kilometers, not: {}",
                    radius
                )));
            }
        }
        Ok(QueryParams::new()
            .with_opt("q", self.query.as_deref().filter(|q| !q.is_empty()))
            .with_opt("category", self.category.as_deref().filter(|c| !c.is_empty()))
            .with_opt("radius", self.radius)
            .with_opt("limit", self.limit)
            .with_opt("start", self.start))
    }
}

/// Places endpoints, borrowed from a [`Client`].
pub struct PlacesApi<'a, T: HttpTransport> {
    client: &'a Client<T>,
}

impl<'a, T: HttpTransport> PlacesApi<'a, T> {
    pub(super) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Creates a feature and returns the handle the server assigned.
    ///
    /// # Arguments
    ///
    /// * `feature` - New feature; it must not carry a handle yet
    ///
    /// # Returns
    ///
    /// The assigned handle. Anything other than a `202 Accepted` whose body
    /// has a well-formed handle under `id` is reported as an [`ApiError`]
    /// carrying the status and raw body.
    pub fn add_feature(&self, feature: &Feature) -> Result<Handle> {
        if let Some(handle) = feature.id() {
            return Err(Error::invalid_argument(format!(
                "a feature cannot be added to the Places database when it already has a handle: {}",
                handle
            )));
        }

        let url = self.client.endpoint("create", &[])?;
        let response = self
            .client
            .request(&url, Method::Post, Body::Json(feature.to_json()))?;
        if response.status != 202 {
            warn!(status = response.status, "Feature creation not accepted");
            return Err(ApiError::new(response.status, response.body, response.headers).into());
        }

        let created = json_decode(&response.body)?;
        match created
            .get("id")
            .and_then(Value::as_str)
            .and_then(|id| Handle::parse(id).ok())
        {
            Some(handle) => Ok(handle),
            None => {
                warn!(body = %response.body, "Feature creation returned no usable handle");
                Err(ApiError::new(response.status, response.body, response.headers).into())
            }
        }
    }

    /// Replaces a feature; the feature must carry its handle.
    pub fn update_feature(&self, feature: &Feature) -> Result<Value> {
        let handle = feature
            .id()
            .ok_or_else(|| Error::invalid_argument("a feature must have a handle to be updated"))?;
        let url = self
            .client
            .endpoint("feature", &[("handle", handle.as_str())])?;
        self.client
            .request_json(&url, Method::Post, Body::Json(feature.to_json()))
    }

    /// Deletes a feature by handle.
    pub fn delete_feature(&self, handle: &str) -> Result<Value> {
        let handle = Handle::parse(handle)?;
        let url = self
            .client
            .endpoint("feature", &[("handle", handle.as_str())])?;
        self.client.request_json(&url, Method::Delete, Body::Empty)
    }

    /// Features near a point.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in degrees
    /// * `lon` - Longitude in degrees, -180..=180 (wrapped values allowed)
    /// * `options` - Query, category, radius and paging
    ///
    /// # Returns
    ///
    /// The matching features, or an error if the point or radius is invalid.
    pub fn search(&self, lat: f64, lon: f64, options: &SearchOptions) -> Result<Vec<Feature>> {
        let (lat, lon) = validated_point(lat, lon)?;
        let url = self
            .client
            .endpoint("search", &[("lat", &lat), ("lon", &lon)])?;
        self.search_at(&url, options.to_params()?)
    }

    /// Features near the location the server derives from an IP address.
    pub fn search_by_ip(&self, ip: &str, options: &SearchOptions) -> Result<Vec<Feature>> {
        if !is_valid_ip(ip) {
            return Err(Error::invalid_argument(format!(
                "not a valid IP address: {:?}",
                ip
            )));
        }
        let url = self.client.endpoint("search_by_ip", &[("ip", ip)])?;
        self.search_at(&url, options.to_params()?)
    }

    /// Features near the IP address the request arrives from.
    pub fn search_by_my_ip(&self, options: &SearchOptions) -> Result<Vec<Feature>> {
        let url = self.client.endpoint("search_by_my_ip", &[])?;
        self.search_at(&url, options.to_params()?)
    }

    /// Features near a street address geocoded by the server.
    pub fn search_by_address(
        &self,
        address: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Feature>> {
        let address = non_empty_address(address)?;
        let url = self.client.endpoint("search_by_address", &[])?;
        let mut params = QueryParams::new().with("address", address);
        for (name, value) in options.to_params()?.iter() {
            params.push(name, value);
        }
        self.search_at(&url, params)
    }

    fn search_at(&self, url: &str, params: QueryParams) -> Result<Vec<Feature>> {
        let collection = self.client.request_json(url, Method::Get, params.into())?;
        features_from_collection(&collection)
    }
}

/// Decodes the `features` array of a FeatureCollection.
pub(crate) fn features_from_collection(collection: &Value) -> Result<Vec<Feature>> {
    let features = collection
        .get("features")
        .ok_or(ModelError::MissingField("features"))?
        .as_array()
        .ok_or_else(|| ModelError::wrong_type("features", "an array", &collection["features"]))?;

    let mut decoded = Vec::with_capacity(features.len());
    for value in features {
        if let Some(feature) = Feature::from_dict(value, false)? {
            decoded.push(feature);
        }
    }
    Ok(decoded)
}
