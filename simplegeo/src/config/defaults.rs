//! Default values for all configuration settings.

use super::file::config_directory;
use super::settings::*;

pub const DEFAULT_HOST: &str = "api.simplegeo.com";
pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_API_VERSION: &str = "1.0";
pub const DEFAULT_REALM: &str = "http://api.simplegeo.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE_NAME: &str = "simplegeo.log";

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            version: DEFAULT_API_VERSION.to_string(),
            realm: DEFAULT_REALM.to_string(),
        }
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            ca_certs: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: config_directory().join(DEFAULT_LOG_FILE_NAME),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            credentials: CredentialsSettings::default(),
            api: ApiSettings::default(),
            transport: TransportSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
