//! SimpleGeo feature handles.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use super::ModelError;

/// Grammar of a feature handle.
///
/// `SG_` followed by 22 alphanumerics, an optional `_<lat>_<lon>` suffix
/// and an optional `@<version>` suffix.
pub const HANDLE_PATTERN: &str = r"^SG_[A-Za-z0-9]{22}(?:_-?[0-9]{1,3}(?:\.[0-9]+)?_-?[0-9]{1,3}(?:\.[0-9]+)?)?(?:@[0-9]+)?$";

fn handle_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HANDLE_PATTERN).expect("handle pattern is a valid regex"))
}

/// Returns true if `s` is a well-formed feature handle.
pub fn is_handle(s: &str) -> bool {
    handle_regex().is_match(s)
}

/// A globally unique feature identifier assigned by the Places service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Validates and wraps a handle string.
    ///
    /// # Arguments
    ///
    /// * `s` - `SG_` followed by 22 alphanumerics, optionally suffixed with
    ///   `_<lat>_<lon>` and/or `@<epoch>`
    ///
    /// # Returns
    ///
    /// The handle, or [`ModelError::InvalidHandle`] carrying the rejected text.
    pub fn parse(s: impl Into<String>) -> Result<Self, ModelError> {
        let s = s.into();
        if is_handle(&s) {
            Ok(Self(s))
        } else {
            Err(ModelError::InvalidHandle(s))
        }
    }

    /// The handle text, exactly as parsed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwraps the handle text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Handle {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Handle {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Handle::parse(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_handle() {
        assert!(is_handle("SG_abcdefghijklmnopqrstuv"));
        assert!(is_handle("SG_4CsrE4oNy1gl8hCLdwu0F0"));
    }

    #[test]
    fn test_handle_with_location_suffix() {
        assert!(is_handle("SG_4bgzicKFmP89tQFGLGZYy0_34.714646_-86.584970"));
        assert!(is_handle("SG_4bgzicKFmP89tQFGLGZYy0_34_-86"));
    }

    #[test]
    fn test_handle_with_version_suffix() {
        assert!(is_handle("SG_abcdefghijklmnopqrstuv@1290636830"));
        assert!(is_handle("SG_4bgzicKFmP89tQFGLGZYy0_34.714646_-86.584970@3"));
    }

    #[test]
    fn test_rejects_malformed_handles() {
        // 21 characters
        assert!(!is_handle("SG_abcdefghijklmnopqrstu"));
        // 23 characters
        assert!(!is_handle("SG_abcdefghijklmnopqrstuvw"));
        assert!(!is_handle("sg_abcdefghijklmnopqrstuv"));
        assert!(!is_handle("SG_abcdefghijklmnopqrstuv_34.7"));
        assert!(!is_handle("SG_abcdefghijklmnopqrstuv_1234_5"));
        assert!(!is_handle("SG_abcdefghijklmnopqrstuv@"));
        assert!(!is_handle(" SG_abcdefghijklmnopqrstuv"));
        assert!(!is_handle(""));
    }

    #[test]
    fn test_parse_error_names_value() {
        let err = Handle::parse("SG_nope").unwrap_err();
        assert!(matches!(err, ModelError::InvalidHandle(ref h) if h == "SG_nope"));
        assert!(err.to_string().contains("SG_nope"));
    }

    #[test]
    fn test_serde_transparent() {
        let handle: Handle = "SG_abcdefghijklmnopqrstuv".parse().unwrap();
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(json, "\"SG_abcdefghijklmnopqrstuv\"");

        let back: Handle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, handle);
        assert!(serde_json::from_str::<Handle>("\"SG_bad\"").is_err());
    }
}
