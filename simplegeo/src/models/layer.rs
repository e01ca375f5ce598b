//! Storage layers.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde_json::{json, Value};

use super::{is_absent, json_decode, ModelError};
use crate::error::Error;

/// Configuration of a named record container.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layer {
    pub name: String,
    pub title: String,
    pub description: String,
    pub public: bool,
    pub callback_urls: Vec<String>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn with_callback_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.callback_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Builds a layer from its wire form.
    ///
    /// Only `name` is required; missing or null fields take their defaults.
    pub fn from_dict(data: &Value) -> Result<Option<Self>, ModelError> {
        if is_absent(data) {
            return Ok(None);
        }
        let obj = data
            .as_object()
            .ok_or_else(|| ModelError::wrong_type("layer", "an object", data))?;

        let name = match obj.get("name") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(ModelError::wrong_type("name", "a string", other)),
            None => return Err(ModelError::MissingField("name")),
        };
        let text = |field: &'static str| -> Result<String, ModelError> {
            match obj.get(field) {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(ModelError::wrong_type(field, "a string", other)),
            }
        };
        let public = match obj.get("public") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => return Err(ModelError::wrong_type("public", "a boolean", other)),
        };
        let callback_urls = match obj.get("callback_urls") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(urls)) => urls
                .iter()
                .map(|u| {
                    u.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ModelError::wrong_type("callback_urls", "a list of strings", u))
                })
                .collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(ModelError::wrong_type("callback_urls", "a list of strings", other))
            }
        };

        Ok(Some(Layer {
            title: text("title")?,
            description: text("description")?,
            name,
            public,
            callback_urls,
        }))
    }

    pub fn to_dict(&self) -> Value {
        json!({
            "name": self.name,
            "title": self.title,
            "description": self.description,
            "public": self.public,
            "callback_urls": self.callback_urls,
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

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Layer {}

impl Hash for Layer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let layer = Layer::new("com.example.stores")
            .with_title("Stores")
            .with_description("Retail locations")
            .with_public(true)
            .with_callback_urls(["http://example.com/hook", "http://example.com/other"]);

        let back = Layer::from_json(&layer.to_json()).unwrap().unwrap();
        assert_eq!(back, layer);
        assert_eq!(back.title, "Stores");
        assert_eq!(back.description, "Retail locations");
        assert!(back.public);
        assert_eq!(back.callback_urls, layer.callback_urls);
    }

    #[test]
    fn test_from_dict_defaults() {
        let layer = Layer::from_dict(&json!({"name": "a", "title": null}))
            .unwrap()
            .unwrap();
        assert_eq!(layer.title, "");
        assert!(!layer.public);
        assert!(layer.callback_urls.is_empty());
    }

    #[test]
    fn test_from_dict_requires_name() {
        assert_eq!(
            Layer::from_dict(&json!({"title": "x"})).unwrap_err(),
            ModelError::MissingField("name")
        );
        assert!(Layer::from_dict(&json!({})).unwrap().is_none());
    }

    #[test]
    fn test_identity_is_name() {
        let a = Layer::new("same").with_title("one");
        let b = Layer::new("same").with_public(true);
        assert_eq!(a, b);
        assert_ne!(a, Layer::new("other"));
    }

    #[test]
    fn test_display_field_order() {
        let layer = Layer::new("n");
        assert_eq!(
            layer.to_string(),
            r#"{"name":"n","title":"","description":"","public":false,"callback_urls":[]}"#
        );
    }
}
