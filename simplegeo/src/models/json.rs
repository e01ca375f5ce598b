//! JSON decoding shared by the models and the client.

use serde_json::Value;

use crate::error::DecodeError;

/// Decodes a response body.
///
/// An empty (or all-whitespace) body decodes to `null`. Malformed text
/// becomes a [`DecodeError`] that keeps the original body.
pub fn json_decode(body: &str) -> Result<Value, DecodeError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| DecodeError::new(body, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_null() {
        assert_eq!(json_decode("").unwrap(), Value::Null);
        assert_eq!(json_decode("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_decimal_text_is_kept() {
        let value = json_decode(r#"{"lat": 37.80}"#).unwrap();
        assert_eq!(value["lat"].to_string(), "37.80");
    }

    #[test]
    fn test_malformed_body_is_retained() {
        let err = json_decode("this is not json").unwrap_err();
        assert_eq!(err.body(), "this is not json");
        assert!(err.to_string().contains("Could not decode JSON"));
    }
}
