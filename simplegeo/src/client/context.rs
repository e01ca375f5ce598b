//! Context API: what is known about a location.

use serde_json::Value;

use super::Client;
use crate::coord::{is_valid_ip, is_valid_lat, is_valid_lon, CoordError, Degrees};
use crate::error::{Error, Result};
use crate::http::{Body, HttpTransport, Method, QueryParams};

/// Context endpoints, borrowed from a [`Client`].
pub struct ContextApi<'a, T: HttpTransport> {
    client: &'a Client<T>,
}

impl<'a, T: HttpTransport> ContextApi<'a, T> {
    pub(super) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Context for a latitude/longitude.
    pub fn get_context(&self, lat: f64, lon: f64) -> Result<Value> {
        let (lat, lon) = validated_point(lat, lon)?;
        let url = self
            .client
            .endpoint("context", &[("lat", &lat), ("lon", &lon)])?;
        self.client.request_json(&url, Method::Get, Body::Empty)
    }

    /// Context for the location the server derives from an IP address.
    pub fn get_context_by_ip(&self, ip: &str) -> Result<Value> {
        if !is_valid_ip(ip) {
            return Err(Error::invalid_argument(format!(
                "not a valid IP address: {:?}",
                ip
            )));
        }
        let url = self.client.endpoint("context_by_ip", &[("ip", ip)])?;
        self.client.request_json(&url, Method::Get, Body::Empty)
    }

    /// Context for the IP address the request arrives from.
    pub fn get_context_by_my_ip(&self) -> Result<Value> {
        let url = self.client.endpoint("context_by_my_ip", &[])?;
        self.client.request_json(&url, Method::Get, Body::Empty)
    }

    /// Context for a street address geocoded by the server.
    pub fn get_context_by_address(&self, address: &str) -> Result<Value> {
        let address = non_empty_address(address)?;
        let url = self.client.endpoint("context_by_address", &[])?;
        let params = QueryParams::new().with("address", address);
        self.client.request_json(&url, Method::Get, params.into())
    }
}

/// Checks a point and renders both halves for a URL path.
pub(crate) fn validated_point(lat: f64, lon: f64) -> Result<(String, String)> {
    if !is_valid_lat(lat) {
        return Err(CoordError::InvalidLatitude(Degrees::from_f64(lat)?).into());
    }
    if !is_valid_lon(lon, false) {
        return Err(CoordError::InvalidLongitude {
            value: Degrees::from_f64(lon)?,
            strict: false,
        }
        .into());
    }
    Ok((lat.to_string(), lon.to_string()))
}

pub(crate) fn non_empty_address(address: &str) -> Result<&str> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_argument("address must not be empty"));
    }
    Ok(trimmed)
}
