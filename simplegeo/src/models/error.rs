//! Errors raised while building or decoding domain models.

use thiserror::Error;

use crate::coord::CoordError;

/// Local precondition and wire-shape failures for records, features and layers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Coordinates failed the shape or range checks
    #[error(
        "coordinates are required to be a 2-element sequence of lat, lon for a point \
         (or a more complicated set of coordinates for polygons or multipolygons), \
         but were {coordinates}: {source}"
    )]
    InvalidCoordinates {
        coordinates: String,
        #[source]
        source: CoordError,
    },

    /// A handle did not match the handle grammar
    #[error(
        "handle is required to match the regex {pattern}, but it was {0:?}",
        pattern = super::HANDLE_PATTERN
    )]
    InvalidHandle(String),

    /// A record id was empty
    #[error("record id must be a non-empty string (layer {layer:?})")]
    InvalidRecordId { layer: String },

    /// A required wire field was absent
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A wire field had the wrong JSON type
    #[error("field '{field}' must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A reserved key was inserted into a property bag
    #[error("'{0}' is reserved and cannot be stored as a property")]
    ReservedProperty(String),
}

impl ModelError {
    pub(crate) fn wrong_type(
        field: &'static str,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        ModelError::WrongType {
            field,
            expected,
            found: found.to_string(),
        }
    }
}
