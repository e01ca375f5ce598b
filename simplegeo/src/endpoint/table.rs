//! The named endpoint table.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use super::{EndpointError, Template};

/// A group of endpoints served by one part of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    Features,
    Context,
    Places,
    Storage,
}

impl ApiFamily {
    pub const ALL: [ApiFamily; 4] = [
        ApiFamily::Features,
        ApiFamily::Context,
        ApiFamily::Places,
        ApiFamily::Storage,
    ];

    /// The `(name, template)` pairs this family registers.
    pub fn endpoints(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ApiFamily::Features => FEATURES,
            ApiFamily::Context => CONTEXT,
            ApiFamily::Places => PLACES,
            ApiFamily::Storage => STORAGE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ApiFamily::Features => "features",
            ApiFamily::Context => "context",
            ApiFamily::Places => "places",
            ApiFamily::Storage => "storage",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const FEATURES: &[(&str, &str)] = &[
    ("feature", "features/{handle}.json"),
    ("annotations", "features/{handle}/annotations.json"),
];

const CONTEXT: &[(&str, &str)] = &[
    ("context", "context/{lat},{lon}.json"),
    ("context_by_ip", "context/{ip}.json"),
    ("context_by_my_ip", "context/ip.json"),
    ("context_by_address", "context/address.json"),
];

const PLACES: &[(&str, &str)] = &[
    ("create", "places"),
    ("search", "places/{lat},{lon}.json"),
    ("search_by_ip", "places/{ip}.json"),
    ("search_by_my_ip", "places/ip.json"),
    ("search_by_address", "places/address.json"),
];

const STORAGE: &[(&str, &str)] = &[
    ("record", "records/{layer}/{id}.json"),
    ("records", "records/{layer}/{ids}.json"),
    ("add_records", "records/{layer}.json"),
    ("history", "records/{layer}/{id}/history.json"),
    ("nearby", "records/{layer}/nearby/{arg}.json"),
    ("layer", "layers/{layer}.json"),
    ("layers", "layers.json"),
];

#[derive(Debug, Clone)]
struct Entry {
    family: ApiFamily,
    template: Template,
}

/// Collects endpoint registrations and rejects duplicate names.
#[derive(Debug, Default)]
pub struct EndpointTableBuilder {
    entries: BTreeMap<String, Entry>,
}

impl EndpointTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        family: ApiFamily,
        name: &str,
        template: &str,
    ) -> Result<&mut Self, EndpointError> {
        if let Some(existing) = self.entries.get(name) {
            return Err(EndpointError::Collision {
                name: name.to_string(),
                existing: existing.family.to_string(),
                incoming: family.to_string(),
            });
        }
        let template = Template::parse(template)?;
        self.entries
            .insert(name.to_string(), Entry { family, template });
        Ok(self)
    }

    pub fn register_family(&mut self, family: ApiFamily) -> Result<&mut Self, EndpointError> {
        for (name, template) in family.endpoints() {
            self.register(family, name, template)?;
        }
        Ok(self)
    }

    pub fn build(self) -> EndpointTable {
        EndpointTable {
            entries: self.entries,
        }
    }
}

/// Immutable map from endpoint name to URL template.
#[derive(Debug, Clone)]
pub struct EndpointTable {
    entries: BTreeMap<String, Entry>,
}

impl EndpointTable {
    /// The table of every API family.
    pub fn standard() -> Result<Self, EndpointError> {
        let mut builder = EndpointTableBuilder::new();
        for family in ApiFamily::ALL {
            builder.register_family(family)?;
        }
        Ok(builder.build())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn family(&self, name: &str) -> Option<ApiFamily> {
        self.entries.get(name).map(|e| e.family)
    }

    pub fn template(&self, name: &str) -> Option<&Template> {
        self.entries.get(name).map(|e| &e.template)
    }

    /// Resolves `name` to a relative path.
    pub fn resolve(&self, name: &str, args: &[(&str, &str)]) -> Result<String, EndpointError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| EndpointError::UnknownEndpoint(name.to_string()))?;
        entry.template.render(name, args)
    }

    /// Resolves `name` to an absolute URL under `base_uri` and `api_version`.
    pub fn url(
        &self,
        base_uri: &str,
        api_version: &str,
        name: &str,
        args: &[(&str, &str)],
    ) -> Result<String, EndpointError> {
        let path = self.resolve(name, args)?;
        let url = format!(
            "{}/{}/{}",
            base_uri.trim_end_matches('/'),
            api_version.trim_matches('/'),
            path
        );
        trace!(endpoint = name, url = %url, "Resolved endpoint");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://api.simplegeo.com:80";

    fn table() -> EndpointTable {
        EndpointTable::standard().unwrap()
    }

    #[test]
    fn test_standard_table_is_complete() {
        let table = table();
        assert_eq!(table.len(), 18);
        assert_eq!(table.family("feature"), Some(ApiFamily::Features));
        assert_eq!(table.family("context_by_address"), Some(ApiFamily::Context));
        assert_eq!(table.family("create"), Some(ApiFamily::Places));
        assert_eq!(table.family("layers"), Some(ApiFamily::Storage));
    }

    #[test]
    fn test_feature_url() {
        let url = table()
            .url(BASE, "1.0", "feature", &[("handle", "SG_abcdefghijklmnopqrstuv")])
            .unwrap();
        assert_eq!(
            url,
            "http://api.simplegeo.com:80/1.0/features/SG_abcdefghijklmnopqrstuv.json"
        );
    }

    #[test]
    fn test_context_url() {
        let url = table()
            .url(BASE, "1.0", "context", &[("lat", "37.8016"), ("lon", "-122.4783")])
            .unwrap();
        assert_eq!(
            url,
            "http://api.simplegeo.com:80/1.0/context/37.8016,-122.4783.json"
        );
    }

    #[test]
    fn test_records_url() {
        let url = table()
            .url(BASE, "1.0", "records", &[("layer", "com.example"), ("ids", "a,b,c")])
            .unwrap();
        assert_eq!(url, "http://api.simplegeo.com:80/1.0/records/com.example/a,b,c.json");
    }

    #[test]
    fn test_placeholder_free_endpoints() {
        let table = table();
        assert_eq!(table.resolve("layers", &[]).unwrap(), "layers.json");
        assert_eq!(table.resolve("create", &[]).unwrap(), "places");
        assert_eq!(table.resolve("context_by_my_ip", &[]).unwrap(), "context/ip.json");
    }

    #[test]
    fn test_unknown_endpoint() {
        let err = table().resolve("nope", &[]).unwrap_err();
        assert_eq!(err, EndpointError::UnknownEndpoint("nope".to_string()));
        assert_eq!(err.to_string(), "No endpoint named \"nope\"");
    }

    #[test]
    fn test_missing_argument_names_placeholder() {
        let err = table().resolve("record", &[("layer", "l")]).unwrap_err();
        assert!(err.to_string().contains("\"id\""));
    }

    #[test]
    fn test_collision_is_rejected() {
        let mut builder = EndpointTableBuilder::new();
        builder.register_family(ApiFamily::Storage).unwrap();
        let err = builder
            .register(ApiFamily::Places, "record", "places/{id}.json")
            .unwrap_err();
        assert_eq!(
            err,
            EndpointError::Collision {
                name: "record".to_string(),
                existing: "storage".to_string(),
                incoming: "places".to_string(),
            }
        );
    }

    #[test]
    fn test_families_are_disjoint() {
        let mut seen = std::collections::HashSet::new();
        for family in ApiFamily::ALL {
            for (name, _) in family.endpoints() {
                assert!(seen.insert(*name), "{} registered twice", name);
            }
        }
    }
}
