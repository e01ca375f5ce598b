//! INI parsing: `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty(v: &str) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [credentials] section
    if let Some(section) = ini.section(Some("credentials")) {
        if let Some(v) = section.get("key") {
            config.credentials.key = non_empty(v);
        }
        if let Some(v) = section.get("secret") {
            config.credentials.secret = non_empty(v);
        }
    }

    // [api] section
    if let Some(section) = ini.section(Some("api")) {
        if let Some(v) = section.get("host").and_then(non_empty) {
            if v.contains('/') || v.contains(':') {
                return Err(invalid(
                    "api",
                    "host",
                    &v,
                    "must be a bare host name without scheme or port",
                ));
            }
            config.api.host = v;
        }
        if let Some(v) = section.get("port") {
            config.api.port = v
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| invalid("api", "port", v, "must be an integer between 1 and 65535"))?;
        }
        if let Some(v) = section.get("version").and_then(non_empty) {
            config.api.version = v;
        }
        if let Some(v) = section.get("realm").and_then(non_empty) {
            config.api.realm = v;
        }
    }

    // [transport] section
    if let Some(section) = ini.section(Some("transport")) {
        if let Some(v) = section.get("timeout") {
            config.transport.timeout = v.trim().parse().map_err(|_| {
                invalid(
                    "transport",
                    "timeout",
                    v,
                    "must be a non-negative integer (seconds, 0 = no timeout)",
                )
            })?;
        }
        if let Some(v) = section.get("ca_certs") {
            config.transport.ca_certs = non_empty(v).map(|p| expand_tilde(&p));
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file").and_then(non_empty) {
            config.logging.file = expand_tilde(&v);
        }
    }

    Ok(config)
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
