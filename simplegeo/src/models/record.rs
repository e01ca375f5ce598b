//! Storage records.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::Utc;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::{is_absent, json_decode, ModelError};
use crate::coord::{Coordinates, Degrees};
use crate::error::Error;

/// Record type used when none is given.
pub const DEFAULT_RECORD_TYPE: &str = "object";

/// Keys that are stored as record fields and never in the property bag.
pub const RESERVED_KEYS: [&str; 6] = ["layer", "id", "type", "created", "lat", "lon"];

/// A point stored in a SimpleGeo storage layer.
///
/// Records are identified by `(layer, id)`; two records with the same
/// layer and id compare equal even if their positions differ.
#[derive(Debug, Clone)]
pub struct Record {
    layer: String,
    id: String,
    lat: Degrees,
    lon: Degrees,
    record_type: String,
    created: i64,
    properties: Map<String, Value>,
}

impl Record {
    /// Creates a record stamped with the current time.
    ///
    /// Latitude must lie within -90..=90 and longitude within -360..=360.
    pub fn new(
        layer: impl Into<String>,
        id: impl Into<String>,
        lat: Degrees,
        lon: Degrees,
    ) -> Result<Self, ModelError> {
        let layer = layer.into();
        let id = id.into();
        if id.is_empty() {
            return Err(ModelError::InvalidRecordId { layer });
        }

        let position = Coordinates::point(lat.clone(), lon.clone());
        position
            .validate_lat_lon(false)
            .map_err(|source| ModelError::InvalidCoordinates {
                coordinates: position.to_string(),
                source,
            })?;

        Ok(Self {
            layer,
            id,
            lat,
            lon,
            record_type: DEFAULT_RECORD_TYPE.to_string(),
            created: Utc::now().timestamp(),
            properties: Map::new(),
        })
    }

    pub fn with_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    pub fn with_created(mut self, created: i64) -> Self {
        self.created = created;
        self
    }

    /// Adds a property, failing on reserved keys.
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, ModelError> {
        self.insert_property(key, value)?;
        Ok(self)
    }

    /// Inserts a property, returning the previous value for that key.
    pub fn insert_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ModelError> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(ModelError::ReservedProperty(key));
        }
        Ok(self.properties.insert(key, value.into()))
    }

    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lat(&self) -> &Degrees {
        &self.lat
    }

    pub fn lon(&self) -> &Degrees {
        &self.lon
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    pub fn created(&self) -> i64 {
        self.created
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Builds a record from its wire form.
    ///
    /// Returns `Ok(None)` for `null` or an empty object. The wire
    /// coordinates are `[lon, lat]`. Properties other than the reserved
    /// keys land in the property bag.
    pub fn from_dict(data: &Value) -> Result<Option<Self>, ModelError> {
        if is_absent(data) {
            return Ok(None);
        }
        let obj = data
            .as_object()
            .ok_or_else(|| ModelError::wrong_type("record", "an object", data))?;

        let id = match obj.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => return Err(ModelError::wrong_type("id", "a string", other)),
            None => return Err(ModelError::MissingField("id")),
        };

        let coordinates = obj
            .get("geometry")
            .and_then(|g| g.get("coordinates"))
            .ok_or(ModelError::MissingField("geometry.coordinates"))?;
        let (lon, lat) = match Coordinates::from_value(coordinates) {
            Ok(Coordinates::Pair(lon, lat)) => (lon, lat),
            Ok(Coordinates::Nested(_)) => {
                return Err(ModelError::wrong_type(
                    "geometry.coordinates",
                    "a point",
                    coordinates,
                ))
            }
            Err(source) => {
                return Err(ModelError::InvalidCoordinates {
                    coordinates: coordinates.to_string(),
                    source,
                })
            }
        };

        let properties = match obj.get("properties") {
            Some(Value::Object(map)) => map,
            Some(other) => return Err(ModelError::wrong_type("properties", "an object", other)),
            None => return Err(ModelError::MissingField("properties")),
        };
        let layer = match properties.get("layer") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(ModelError::wrong_type("properties.layer", "a string", other)),
            None => return Err(ModelError::MissingField("properties.layer")),
        };

        let mut record = Record::new(layer, id, lat, lon)?;
        match obj.get("created") {
            Some(value @ Value::Number(n)) => {
                record.created = n
                    .as_i64()
                    .or_else(|| n.as_f64().map(|f| f as i64))
                    .ok_or_else(|| ModelError::wrong_type("created", "an integer", value))?;
            }
            Some(Value::Null) | None => {}
            Some(other) => return Err(ModelError::wrong_type("created", "an integer", other)),
        }
        if let Some(Value::String(t)) = properties.get("type") {
            record.record_type = t.clone();
        }
        record.properties = properties
            .iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Some(record))
    }

    /// Builds the wire form, a GeoJSON point feature.
    pub fn to_dict(&self) -> Value {
        let mut properties = Map::with_capacity(self.properties.len() + 2);
        properties.insert("layer".to_string(), Value::String(self.layer.clone()));
        properties.insert("type".to_string(), Value::String(self.record_type.clone()));
        properties.extend(self.properties.iter().map(|(k, v)| (k.clone(), v.clone())));

        json!({
            "type": "Feature",
            "id": self.id,
            "created": self.created,
            "geometry": {
                "type": "Point",
                "coordinates": [self.lon, self.lat],
            },
            "properties": properties,
        })
    }

    pub fn to_json(&self) -> String {
        self.to_dict().to_string()
    }

    pub fn from_json(text: &str) -> Result<Option<Self>, Error> {
        let value = json_decode(text)?;
        Ok(Self::from_dict(&value)?)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.layer == other.layer && self.id == other.id
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.layer.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dict().serialize(serializer)
    }
}
