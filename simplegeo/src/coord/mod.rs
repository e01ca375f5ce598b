//! Coordinate handling module
//!
//! SimpleGeo's domain models hold positions as (latitude, longitude) while
//! GeoJSON on the wire uses (longitude, latitude). This module provides the
//! order swap between the two conventions and the range checks applied to
//! every position before it leaves or enters the client.

mod types;

pub use types::{
    CoordError, Coordinates, Degrees, MAX_LAT, MAX_LON, MAX_WRAPPED_LON, MIN_LAT, MIN_LON,
    MIN_WRAPPED_LON,
};

use serde_json::Value;
use std::net::IpAddr;

/// Returns true if `lat` lies within -90..=90.
#[inline]
pub fn is_valid_lat(lat: f64) -> bool {
    (MIN_LAT..=MAX_LAT).contains(&lat)
}

/// Returns true if `lon` is a usable longitude.
///
/// Longitude is defined over -180..=180, but shapes drawn around the
/// antimeridian often carry values that have wrapped past 180 (a polygon
/// around eastern Russia may use 190.9 instead of -169.1). With `strict`
/// set only -180..=180 passes; otherwise -360..=360 is accepted.
#[inline]
pub fn is_valid_lon(lon: f64, strict: bool) -> bool {
    if strict {
        (MIN_LON..=MAX_LON).contains(&lon)
    } else {
        (MIN_WRAPPED_LON..=MAX_WRAPPED_LON).contains(&lon)
    }
}

/// Returns true if `s` parses as an IPv4 or IPv6 address.
pub fn is_valid_ip(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// Reverses every leaf pair of a raw coordinate structure.
///
/// The shape of the input is preserved. Fails if the structure violates
/// the leaf rules described on [`Coordinates::from_value`].
pub fn deep_swap(value: &Value) -> Result<Value, CoordError> {
    Ok(Coordinates::from_value(value)?.swapped().to_value())
}

/// Validates every leaf of a raw structure as a (lat, lon) pair.
pub fn deep_validate_lat_lon(value: &Value, strict: bool) -> Result<(), CoordError> {
    Coordinates::from_value(value)?.validate_lat_lon(strict)
}
