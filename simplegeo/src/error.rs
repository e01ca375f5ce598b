//! Error taxonomy
//!
//! Remote failures are [`ApiError`]s: an HTTP status outside 2xx/3xx, or a
//! transport failure (connect, TLS, timeout) with no status at all.
//! [`DecodeError`] is raised when the server answers with a body that is
//! not valid JSON. Local precondition failures are caught before anything
//! is sent and surface as the remaining [`Error`] variants.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::coord::CoordError;
use crate::endpoint::EndpointError;
use crate::models::ModelError;

/// Response headers keyed by lower-case name.
pub type ResponseHeaders = BTreeMap<String, String>;

/// Message carried by every [`DecodeError`].
pub const DECODE_ERROR_MESSAGE: &str = "Could not decode JSON from server";

/// A failure reported by, or on the way to, the SimpleGeo API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status; `None` when no response was received
    pub code: Option<u16>,
    /// Raw response body, or the transport error message
    pub message: String,
    /// Response headers, when a response was received
    pub headers: Option<ResponseHeaders>,
    /// Server-provided explanation, if the body carried one
    pub description: Option<String>,
}

impl ApiError {
    pub fn new(code: u16, message: impl Into<String>, headers: ResponseHeaders) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            headers: Some(headers),
            description: None,
        }
    }

    /// An error raised before any response arrived.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            headers: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (#{})", self.message, code)?,
            None => write!(f, "{} (#None)", self.message)?,
        }
        if let Some(description) = &self.description {
            write!(f, " {}", description)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// The server's response could not be decoded as JSON.
#[derive(Debug, Error)]
#[error("{msg} (#None) {source}: {body:?}", msg = DECODE_ERROR_MESSAGE)]
pub struct DecodeError {
    body: String,
    #[source]
    source: serde_json::Error,
}

impl DecodeError {
    pub fn new(body: impl Into<String>, source: serde_json::Error) -> Self {
        Self {
            body: body.into(),
            source,
        }
    }

    /// The raw body that failed to decode.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn parser_error(&self) -> &serde_json::Error {
        &self.source
    }

    /// Views this failure as an [`ApiError`] with no status code.
    pub fn as_api_error(&self) -> ApiError {
        ApiError::transport(DECODE_ERROR_MESSAGE).with_description(self.source.to_string())
    }
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid coordinates: {0}")]
    Coordinates(#[from] CoordError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// The remote-failure view of this error, for `Api` and `Decode`.
    pub fn api_error(&self) -> Option<ApiError> {
        match self {
            Error::Api(e) => Some(e.clone()),
            Error::Decode(e) => Some(e.as_api_error()),
            _ => None,
        }
    }

    /// HTTP status of an `Api` error.
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::Api(e) => e.code,
            _ => None,
        }
    }
}

/// Result type for SimpleGeo operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(404, "not here", ResponseHeaders::new())
            .with_description("No such record");
        assert_eq!(err.to_string(), "not here (#404) No such record");
    }

    #[test]
    fn test_transport_error_has_no_code() {
        let err = ApiError::transport("connection refused");
        assert_eq!(err.code, None);
        assert!(err.headers.is_none());
        assert_eq!(err.to_string(), "connection refused (#None)");
    }

    #[test]
    fn test_decode_error_view() {
        let source = serde_json::from_str::<serde_json::Value>("this is not json").unwrap_err();
        let err = DecodeError::new("this is not json", source);

        assert_eq!(err.body(), "this is not json");
        assert!(err.to_string().starts_with(DECODE_ERROR_MESSAGE));

        let api = Error::from(err).api_error().unwrap();
        assert_eq!(api.code, None);
        assert_eq!(api.message, DECODE_ERROR_MESSAGE);
        assert!(api.description.is_some());
    }

    #[test]
    fn test_code_only_for_api_errors() {
        let err = Error::from(ApiError::new(500, "boom", ResponseHeaders::new()));
        assert_eq!(err.code(), Some(500));
        assert_eq!(Error::invalid_argument("x").code(), None);
        assert!(Error::invalid_argument("x").api_error().is_none());
    }
}
