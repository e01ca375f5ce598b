//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// OAuth consumer credentials
    pub credentials: CredentialsSettings,
    /// API endpoint location
    pub api: ApiSettings,
    /// HTTP transport settings
    pub transport: TransportSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[credentials]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsSettings {
    /// OAuth consumer key
    pub key: Option<String>,
    /// OAuth consumer secret
    pub secret: Option<String>,
}

/// `[api]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    /// API version path segment, e.g. "1.0"
    pub version: String,
    /// OAuth realm sent in the Authorization header
    pub realm: String,
}

/// `[transport]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// Request timeout in seconds; 0 disables the timeout
    pub timeout: u64,
    /// PEM bundle of trusted root certificates. Enables HTTPS.
    pub ca_certs: Option<PathBuf>,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
