//! Coordinate type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Strict longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Relaxed longitude range, for shapes that wrap past the antimeridian
pub const MIN_WRAPPED_LON: f64 = -360.0;
pub const MAX_WRAPPED_LON: f64 = 360.0;

/// A single coordinate value in decimal degrees.
///
/// The value keeps the exact decimal text it was parsed from, so `37.80`
/// is written back as `37.80` rather than as the nearest binary float.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(Number);

impl Degrees {
    /// Builds a value from a float. NaN and infinities are rejected.
    pub fn from_f64(value: f64) -> Result<Self, CoordError> {
        Number::from_f64(value)
            .map(Self)
            .ok_or(CoordError::NotFinite(value))
    }

    /// Returns the value as a float for range checks.
    ///
    /// Numbers too large to represent come back as NaN, which fails
    /// every range check.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }

    /// Returns the underlying JSON number.
    pub fn as_number(&self) -> &Number {
        &self.0
    }

    pub(crate) fn from_value(value: &Value) -> Result<Self, CoordError> {
        match value {
            Value::Number(n) => Ok(Self(n.clone())),
            other => Err(CoordError::NonNumeric(other.to_string())),
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::Number(self.0.clone())
    }
}

impl From<i64> for Degrees {
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

impl From<i32> for Degrees {
    fn from(value: i32) -> Self {
        Self(Number::from(value))
    }
}

impl TryFrom<f64> for Degrees {
    type Error = CoordError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl FromStr for Degrees {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Number>()
            .map(Self)
            .map_err(|_| CoordError::NonNumeric(s.to_string()))
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A nested coordinate structure.
///
/// A `Pair` is a leaf holding two numbers; `Nested` holds lines, rings,
/// polygons and so on. The order of the two numbers in a pair is a matter
/// of convention: the domain models keep (lat, lon), GeoJSON uses
/// (lon, lat), and [`Coordinates::swapped`] converts between the two.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    Pair(Degrees, Degrees),
    Nested(Vec<Coordinates>),
}

impl Coordinates {
    /// A single point.
    pub fn point(first: Degrees, second: Degrees) -> Self {
        Self::Pair(first, second)
    }

    /// Parses a raw JSON structure.
    ///
    /// If the first element of a node is a number the node is a leaf and
    /// must hold exactly two numbers; otherwise every child is parsed in
    /// turn.
    pub fn from_value(value: &Value) -> Result<Self, CoordError> {
        let items = value
            .as_array()
            .ok_or_else(|| CoordError::NotASequence(value.to_string()))?;
        let first = items.first().ok_or(CoordError::EmptySequence)?;

        if first.is_number() {
            if items.len() != 2 {
                return Err(CoordError::InvalidPair {
                    len: items.len(),
                    found: value.to_string(),
                });
            }
            return Ok(Self::Pair(
                Degrees::from_value(&items[0])?,
                Degrees::from_value(&items[1])?,
            ));
        }

        items
            .iter()
            .map(Self::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Nested)
    }

    /// Converts back to a raw JSON structure of the same shape.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Pair(a, b) => Value::Array(vec![a.to_value(), b.to_value()]),
            Self::Nested(children) => Value::Array(children.iter().map(Self::to_value).collect()),
        }
    }

    /// Returns a structure of identical shape with every leaf pair reversed.
    ///
    /// Applying this twice yields the original structure.
    pub fn swapped(&self) -> Self {
        match self {
            Self::Pair(a, b) => Self::Pair(b.clone(), a.clone()),
            Self::Nested(children) => Self::Nested(children.iter().map(Self::swapped).collect()),
        }
    }

    /// Checks every leaf as a (lat, lon) pair.
    ///
    /// Stops at the first offending value.
    pub fn validate_lat_lon(&self, strict: bool) -> Result<(), CoordError> {
        match self {
            Self::Pair(lat, lon) => {
                if !super::is_valid_lat(lat.as_f64()) {
                    return Err(CoordError::InvalidLatitude(lat.clone()));
                }
                if !super::is_valid_lon(lon.as_f64(), strict) {
                    return Err(CoordError::InvalidLongitude {
                        value: lon.clone(),
                        strict,
                    });
                }
                Ok(())
            }
            Self::Nested(children) if children.is_empty() => Err(CoordError::EmptySequence),
            Self::Nested(children) => children
                .iter()
                .try_for_each(|child| child.validate_lat_lon(strict)),
        }
    }

    /// Nesting depth: 0 for a bare pair, 1 for a line, 3 for a multipolygon.
    pub fn depth(&self) -> usize {
        match self {
            Self::Pair(..) => 0,
            Self::Nested(children) => 1 + children.first().map(Self::depth).unwrap_or(0),
        }
    }

    /// The first leaf pair, if any.
    pub fn first_pair(&self) -> Option<(&Degrees, &Degrees)> {
        match self {
            Self::Pair(a, b) => Some((a, b)),
            Self::Nested(children) => children.first().and_then(Self::first_pair),
        }
    }
}

impl TryFrom<&Value> for Coordinates {
    type Error = CoordError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl Serialize for Coordinates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Errors raised while validating or reshaping coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside -90..=90
    InvalidLatitude(Degrees),
    /// Longitude is outside -180..=180 (strict) or -360..=360
    InvalidLongitude { value: Degrees, strict: bool },
    /// A node of the structure is not a sequence
    NotASequence(String),
    /// A node of the structure is an empty sequence
    EmptySequence,
    /// A leaf does not hold exactly two numbers
    InvalidPair { len: usize, found: String },
    /// A leaf element is not a number
    NonNumeric(String),
    /// NaN or infinity
    NotFinite(f64),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "not a valid lat: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude { value, strict } => {
                let (min, max) = if *strict {
                    (MIN_LON, MAX_LON)
                } else {
                    (MIN_WRAPPED_LON, MAX_WRAPPED_LON)
                };
                write!(
                    f,
                    "not a valid lon (strict={}): {} (must be between {} and {})",
                    strict, value, min, max
                )
            }
            CoordError::NotASequence(found) => {
                write!(
                    f,
                    "argument is required to be a sequence (of sequences of...) numbers, not: {}",
                    found
                )
            }
            CoordError::EmptySequence => {
                write!(f, "coordinate sequences must not be empty")
            }
            CoordError::InvalidPair { len, found } => {
                write!(
                    f,
                    "the leaf element of this structure is required to hold exactly 2 numbers (a lat and a lon), found {}: {}",
                    len, found
                )
            }
            CoordError::NonNumeric(found) => {
                write!(f, "coordinate value is not a number: {}", found)
            }
            CoordError::NotFinite(value) => {
                write!(f, "coordinate value is not finite: {}", value)
            }
        }
    }
}

impl std::error::Error for CoordError {}
