//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let key = config.credentials.key.as_deref().unwrap_or("");
    let secret = config.credentials.secret.as_deref().unwrap_or("");
    let ca_certs = config
        .transport
        .ca_certs
        .as_deref()
        .map(path_to_string)
        .unwrap_or_default();

    format!(
        r#"[credentials]
; OAuth consumer key and secret from your SimpleGeo account
key = {}
secret = {}

[api]
; API host name, without scheme or port
host = {}
; Port (default: 80; 443 switches to https)
port = {}
; API version path segment (default: 1.0)
version = {}
; OAuth realm (default: http://api.simplegeo.com)
realm = {}

[transport]
; Timeout in seconds for HTTP requests (default: 30, 0 = no timeout)
timeout = {}
; PEM bundle of trusted root certificates. When set, requests use https and
; only certificates issued by these roots are accepted.
ca_certs = {}

[logging]
; Log file path (default: ~/.simplegeo/simplegeo.log)
file = {}
"#,
        key,
        secret,
        config.api.host,
        config.api.port,
        config.api.version,
        config.api.realm,
        config.transport.timeout,
        ca_certs,
        path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_every_section() {
        let text = to_config_string(&ConfigFile::default());
        for section in ["[credentials]", "[api]", "[transport]", "[logging]"] {
            assert!(text.contains(section), "missing {}", section);
        }
        assert!(text.contains("host = api.simplegeo.com"));
        assert!(text.contains("timeout = 30"));
    }

    #[test]
    fn test_secret_written_verbatim() {
        let mut config = ConfigFile::default();
        config.credentials.secret = Some("s3cr3t".to_string());
        assert!(to_config_string(&config).contains("secret = s3cr3t\n"));
    }
}
