//! Common types and utilities shared across CLI commands.

use clap::Args;
use serde_json::Value;

use crate::error::CliError;

/// Where a context lookup or place search is centered.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Point { lat: f64, lon: f64 },
    Ip(String),
    Address(String),
    /// The address the request arrives from
    MyIp,
}

/// Location selection shared by `context` and `search`.
#[derive(Debug, Clone, Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees (use with --lon)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees (use with --lat)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// IPv4 or IPv6 address to locate
    #[arg(long, conflicts_with_all = ["lat", "lon", "address"])]
    pub ip: Option<String>,

    /// Street address to geocode
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub address: Option<String>,
}

impl LocationArgs {
    /// Resolve the arguments to a location. No arguments means "my IP".
    pub fn resolve(&self) -> Result<Location, CliError> {
        match (self.lat, self.lon, &self.ip, &self.address) {
            (Some(lat), Some(lon), None, None) => Ok(Location::Point { lat, lon }),
            (None, None, Some(ip), None) => Ok(Location::Ip(ip.clone())),
            (None, None, None, Some(address)) => Ok(Location::Address(address.clone())),
            (None, None, None, None) => Ok(Location::MyIp),
            _ => Err(CliError::InvalidInput(
                "give either --lat/--lon, --ip or --address".to_string(),
            )),
        }
    }
}

/// Parse a `key=value` property. Values that parse as JSON keep their type;
/// anything else is taken as a string.
pub fn parse_property(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty property name in '{}'", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(lat: Option<f64>, lon: Option<f64>, ip: Option<&str>, address: Option<&str>) -> LocationArgs {
        LocationArgs {
            lat,
            lon,
            ip: ip.map(str::to_string),
            address: address.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_location() {
        assert_eq!(
            args(Some(37.8), Some(-122.4), None, None).resolve().unwrap(),
            Location::Point {
                lat: 37.8,
                lon: -122.4
            }
        );
        assert_eq!(
            args(None, None, Some("192.0.2.1"), None).resolve().unwrap(),
            Location::Ip("192.0.2.1".to_string())
        );
        assert_eq!(args(None, None, None, None).resolve().unwrap(), Location::MyIp);
        assert!(args(Some(1.0), Some(2.0), Some("192.0.2.1"), None)
            .resolve()
            .is_err());
    }

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("name=Golden Gate").unwrap(),
            ("name".to_string(), Value::String("Golden Gate".to_string()))
        );
        assert_eq!(
            parse_property("capacity=200").unwrap(),
            ("capacity".to_string(), serde_json::json!(200))
        );
        assert_eq!(
            parse_property("open=true").unwrap().1,
            Value::Bool(true)
        );
        assert_eq!(parse_property("empty=").unwrap().1, Value::String(String::new()));
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=x").is_err());
    }
}
