//! Places features.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::{is_absent, json_decode, Handle, ModelError};
use crate::coord::Coordinates;
use crate::error::Error;

/// Geometry type used when none is given.
pub const DEFAULT_GEOMETRY_TYPE: &str = "Point";

/// A place in the global Places database.
///
/// Coordinates are held in (lat, lon) order; the wire form uses GeoJSON
/// (lon, lat) order and every conversion applies exactly one swap.
///
/// The handle (`id`) is assigned by the Places service when the feature
/// is added. A `record_id` property is chosen by the caller and lets the
/// service return an existing feature instead of creating a duplicate.
/// A `private` property of `true` keeps the feature visible only to the
/// owning account.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: Option<Handle>,
    coordinates: Coordinates,
    geomtype: String,
    properties: Map<String, Value>,
    strict_lon_validation: bool,
}

/// Builder for [`Feature`].
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    coordinates: Coordinates,
    geomtype: String,
    handle: Option<Handle>,
    properties: Map<String, Value>,
    strict_lon_validation: bool,
}

impl FeatureBuilder {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            geomtype: DEFAULT_GEOMETRY_TYPE.to_string(),
            handle: None,
            properties: Map::new(),
            strict_lon_validation: false,
        }
    }

    pub fn geomtype(mut self, geomtype: impl Into<String>) -> Self {
        self.geomtype = geomtype.into();
        self
    }

    pub fn handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Restricts longitudes to -180..=180 instead of -360..=360.
    pub fn strict_lon_validation(mut self, strict: bool) -> Self {
        self.strict_lon_validation = strict;
        self
    }

    pub fn build(self) -> Result<Feature, ModelError> {
        self.coordinates
            .validate_lat_lon(self.strict_lon_validation)
            .map_err(|source| ModelError::InvalidCoordinates {
                coordinates: self.coordinates.to_string(),
                source,
            })?;

        match self.properties.get("record_id") {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => {
                return Err(ModelError::wrong_type(
                    "properties.record_id",
                    "null or a string",
                    other,
                ))
            }
        }

        let mut properties = Map::with_capacity(self.properties.len() + 1);
        properties.insert("private".to_string(), Value::Bool(false));
        properties.extend(self.properties);

        Ok(Feature {
            id: self.handle,
            coordinates: self.coordinates,
            geomtype: self.geomtype,
            properties,
            strict_lon_validation: self.strict_lon_validation,
        })
    }
}

impl Feature {
    /// A point feature with no handle and default properties.
    pub fn new(coordinates: Coordinates) -> Result<Self, ModelError> {
        FeatureBuilder::new(coordinates).build()
    }

    pub fn builder(coordinates: Coordinates) -> FeatureBuilder {
        FeatureBuilder::new(coordinates)
    }

    pub fn id(&self) -> Option<&Handle> {
        self.id.as_ref()
    }

    /// Returns a copy of this feature carrying `handle`.
    pub fn with_handle(mut self, handle: Handle) -> Self {
        self.id = Some(handle);
        self
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn geomtype(&self) -> &str {
        &self.geomtype
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn strict_lon_validation(&self) -> bool {
        self.strict_lon_validation
    }

    pub fn record_id(&self) -> Option<&str> {
        self.properties.get("record_id").and_then(Value::as_str)
    }

    pub fn is_private(&self) -> bool {
        matches!(self.properties.get("private"), Some(Value::Bool(true)))
    }

    /// Builds a feature from GeoJSON.
    ///
    /// Returns `Ok(None)` for `null` or an empty object.
    pub fn from_dict(data: &Value, strict_lon_validation: bool) -> Result<Option<Self>, ModelError> {
        if is_absent(data) {
            return Ok(None);
        }
        let obj = data
            .as_object()
            .ok_or_else(|| ModelError::wrong_type("feature", "an object", data))?;
        let geometry = obj
            .get("geometry")
            .and_then(Value::as_object)
            .ok_or(ModelError::MissingField("geometry"))?;

        let geomtype = match geometry.get("type") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(ModelError::wrong_type("geometry.type", "a string", other)),
            None => return Err(ModelError::MissingField("geometry.type")),
        };
        let raw = geometry
            .get("coordinates")
            .ok_or(ModelError::MissingField("geometry.coordinates"))?;
        let coordinates = Coordinates::from_value(raw)
            .map_err(|source| ModelError::InvalidCoordinates {
                coordinates: raw.to_string(),
                source,
            })?
            .swapped();

        let mut builder = FeatureBuilder::new(coordinates)
            .geomtype(geomtype)
            .strict_lon_validation(strict_lon_validation);

        match obj.get("id") {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => builder = builder.handle(Handle::parse(s.as_str())?),
            Some(other) => return Err(ModelError::wrong_type("id", "null or a handle", other)),
        }
        match obj.get("properties") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => builder = builder.properties(map.clone()),
            Some(other) => return Err(ModelError::wrong_type("properties", "an object", other)),
        }

        builder.build().map(Some)
    }

    /// Builds the GeoJSON form.
    pub fn to_dict(&self) -> Value {
        json!({
            "type": "Feature",
            "id": self.id,
            "geometry": {
                "type": self.geomtype,
                "coordinates": self.coordinates.swapped(),
            },
            "properties": self.properties,
        })
    }

    pub fn to_json(&self) -> String {
        self.to_dict().to_string()
    }

    pub fn from_json(text: &str, strict_lon_validation: bool) -> Result<Option<Self>, Error> {
        let value = json_decode(text)?;
        Ok(Self::from_dict(&value, strict_lon_validation)?)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dict().serialize(serializer)
    }
}
