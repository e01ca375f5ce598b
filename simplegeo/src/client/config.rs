//! Client connection settings.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    ConfigFile, DEFAULT_API_VERSION, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REALM,
    DEFAULT_TIMEOUT_SECS,
};
use crate::error::Error;
use crate::http::TransportConfig;

/// Credentials and API location for a [`Client`](super::Client).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub key: String,
    pub secret: String,
    pub host: String,
    pub port: u16,
    pub api_version: String,
    pub realm: String,
    /// Trusted roots; setting this forces https
    pub ca_certs: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Settings for the public API with the given OAuth credentials.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_version: DEFAULT_API_VERSION.to_string(),
            realm: DEFAULT_REALM.to_string(),
            ca_certs: None,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    pub fn with_ca_certs(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_certs = Some(path.into());
        self
    }

    /// Sets the request timeout. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `https` when a CA bundle is configured or the port is 443.
    pub fn scheme(&self) -> &'static str {
        if self.ca_certs.is_some() || self.port == 443 {
            "https"
        } else {
            "http"
        }
    }

    /// `scheme://host:port`, the prefix of every endpoint URL.
    pub fn base_uri(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            ca_certs: self.ca_certs.clone(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_version", &self.api_version)
            .field("realm", &self.realm)
            .field("ca_certs", &self.ca_certs)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TryFrom<&ConfigFile> for ClientConfig {
    type Error = Error;

    fn try_from(file: &ConfigFile) -> Result<Self, Self::Error> {
        let key = file.credentials.key.as_deref().unwrap_or("");
        let secret = file.credentials.secret.as_deref().unwrap_or("");
        if key.is_empty() || secret.is_empty() {
            return Err(Error::invalid_argument(
                "credentials.key and credentials.secret must both be set in the config file",
            ));
        }

        let timeout = match file.transport.timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            key: key.to_string(),
            secret: secret.to_string(),
            host: file.api.host.clone(),
            port: file.api.port,
            api_version: file.api.version.clone(),
            realm: file.api.realm.clone(),
            ca_certs: file.transport.ca_certs.clone(),
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("key", "secret");
        assert_eq!(config.base_uri(), "http://api.simplegeo.com:80");
        assert_eq!(config.api_version, "1.0");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_scheme_selection() {
        let config = ClientConfig::new("k", "s").with_port(443);
        assert_eq!(config.base_uri(), "https://api.simplegeo.com:443");

        let config = ClientConfig::new("k", "s")
            .with_host("localhost")
            .with_port(8080)
            .with_ca_certs("/etc/ssl/sg.pem");
        assert_eq!(config.base_uri(), "https://localhost:8080");
        assert_eq!(
            config.transport_config().ca_certs,
            Some(PathBuf::from("/etc/ssl/sg.pem"))
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", ClientConfig::new("visible", "hidden"));
        assert!(rendered.contains("visible"));
        assert!(!rendered.contains("hidden"));
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.credentials.key = Some("k".to_string());
        file.credentials.secret = Some("s".to_string());
        file.api.host = "localhost".to_string();
        file.transport.timeout = 0;

        let config = ClientConfig::try_from(&file).unwrap();
        assert_eq!(config.key, "k");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_from_config_file_requires_credentials() {
        let mut file = ConfigFile::default();
        file.credentials.key = Some("k".to_string());

        let err = ClientConfig::try_from(&file).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
