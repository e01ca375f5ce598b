//! Domain models
//!
//! `Record` (a point in a storage layer), `Feature` (a place in the Places
//! database), `Layer` (a storage layer's configuration) and `Handle` (a
//! feature's global identifier). Each model converts to and from its wire
//! JSON with `to_dict`/`from_dict` and `to_json`/`from_json`.

mod error;
mod feature;
mod handle;
mod json;
mod layer;
mod record;

pub use error::ModelError;
pub use feature::{Feature, FeatureBuilder, DEFAULT_GEOMETRY_TYPE};
pub use handle::{is_handle, Handle, HANDLE_PATTERN};
pub use json::json_decode;
pub use layer::Layer;
pub use record::{Record, DEFAULT_RECORD_TYPE, RESERVED_KEYS};

use serde_json::Value;

/// `null` and `{}` both stand for "no entity" on the wire.
fn is_absent(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
