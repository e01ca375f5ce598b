//! OAuth 1.0 request signing (HMAC-SHA1, two-legged).
//!
//! The signature base string is built from the request method, the
//! normalized URL and every signed parameter:
//!
//! ```text
//! METHOD & escape(scheme://host[:port]/path) & escape(k1=v1&k2=v2...)
//! ```
//!
//! Signed parameters are the `oauth_*` protocol parameters, the URL's query
//! parameters and any form-encoded body parameters, sorted by name then
//! value. A JSON body is not a parameter set; it is covered instead by an
//! `oauth_body_hash` (base64 SHA-1 of the body).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::Rng;
use reqwest::Url;
use sha1::{Digest, Sha1};

use super::Method;
use crate::error::{Error, Result};

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";

/// Percent-encodes `s` as OAuth requires.
pub fn escape(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}

/// Signs requests with a consumer key and secret.
#[derive(Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
    realm: String,
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("realm", &self.realm)
            .finish()
    }
}

impl OAuthSigner {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            realm: realm.into(),
        }
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Builds the `Authorization` header with a fresh nonce and timestamp.
    pub fn authorization_header(
        &self,
        method: Method,
        url: &str,
        form_params: &[(String, String)],
        json_body: Option<&str>,
    ) -> Result<String> {
        let nonce = rand::thread_rng().gen_range(10_000_000u32..100_000_000).to_string();
        let timestamp = Utc::now().timestamp();
        self.authorization_header_with(method, url, form_params, json_body, &nonce, timestamp)
    }

    /// Builds the `Authorization` header with a caller-supplied nonce and
    /// timestamp.
    pub fn authorization_header_with(
        &self,
        method: Method,
        url: &str,
        form_params: &[(String, String)],
        json_body: Option<&str>,
        nonce: &str,
        timestamp: i64,
    ) -> Result<String> {
        let mut oauth_params = self.protocol_params(json_body, nonce, timestamp);
        let base = signature_base_string(method, url, &oauth_params, form_params)?;
        oauth_params.push(("oauth_signature".to_string(), self.sign(&base)?));
        oauth_params.sort();

        let mut header = format!("OAuth realm=\"{}\"", self.realm);
        for (name, value) in &oauth_params {
            header.push_str(&format!(", {}=\"{}\"", escape(name), escape(value)));
        }
        Ok(header)
    }

    /// Signs a base string with `escape(secret)&` (no token secret).
    pub fn sign(&self, base_string: &str) -> Result<String> {
        let key = format!("{}&", escape(&self.consumer_secret));
        let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
            .map_err(|e| Error::invalid_argument(format!("Unusable signing key: {}", e)))?;
        mac.update(base_string.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    fn protocol_params(
        &self,
        json_body: Option<&str>,
        nonce: &str,
        timestamp: i64,
    ) -> Vec<(String, String)> {
        let mut params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ];
        if let Some(body) = json_body {
            params.push(("oauth_body_hash".to_string(), body_hash(body)));
        }
        params
    }
}

/// Base64 SHA-1 digest of a request body.
pub fn body_hash(body: &str) -> String {
    BASE64.encode(Sha1::digest(body.as_bytes()))
}

/// `scheme://host[:port]/path`, with the port dropped when it is the
/// scheme's default and the query removed.
pub fn normalize_url(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::invalid_argument(format!("URL has no host: {}", url)))?;
    let mut normalized = format!("{}://{}", url.scheme(), host.to_ascii_lowercase());
    if let Some(port) = url.port() {
        normalized.push_str(&format!(":{}", port));
    }
    normalized.push_str(url.path());
    Ok(normalized)
}

/// Builds the string that is signed.
pub fn signature_base_string(
    method: Method,
    url: &str,
    oauth_params: &[(String, String)],
    form_params: &[(String, String)],
) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|e| Error::invalid_argument(format!("Invalid URL {}: {}", url, e)))?;

    let mut params: Vec<(String, String)> = oauth_params
        .iter()
        .chain(form_params)
        .map(|(k, v)| (escape(k), escape(v)))
        .chain(
            parsed
                .query_pairs()
                .map(|(k, v)| (escape(&k), escape(&v))),
        )
        .collect();
    params.sort();

    let normalized_params = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.as_str(),
        escape(&normalize_url(&parsed)?),
        escape(&normalized_params)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONCE: &str = "12345678";
    const TIMESTAMP: i64 = 1300000000;

    fn signer() -> OAuthSigner {
        OAuthSigner::new("MY_OAUTH_KEY", "MY_SECRET_KEY", "http://api.simplegeo.com")
    }

    fn signature_of(header: &str) -> String {
        let start = header.find("oauth_signature=\"").unwrap() + "oauth_signature=\"".len();
        let end = start + header[start..].find('"').unwrap();
        percent_encoding::percent_decode_str(&header[start..end])
            .decode_utf8()
            .unwrap()
            .into_owned()
    }

    #[test]
    fn test_escape_unreserved() {
        assert_eq!(escape("abc-._~XYZ019"), "abc-._~XYZ019");
        assert_eq!(escape("a b/c,d=e&f"), "a%20b%2Fc%2Cd%3De%26f");
        assert_eq!(escape("é"), "%C3%A9");
    }

    #[test]
    fn test_normalize_drops_default_port_and_query() {
        let url = Url::parse("http://API.simplegeo.com:80/1.0/layers.json?x=1").unwrap();
        assert_eq!(normalize_url(&url).unwrap(), "http://api.simplegeo.com/1.0/layers.json");

        let url = Url::parse("https://localhost:8443/1.0/layers.json").unwrap();
        assert_eq!(normalize_url(&url).unwrap(), "https://localhost:8443/1.0/layers.json");
    }

    #[test]
    fn test_get_base_string() {
        let oauth = signer().protocol_params(None, NONCE, TIMESTAMP);
        let base = signature_base_string(
            Method::Get,
            "http://api.simplegeo.com:80/1.0/context/37.8016,-122.4783.json",
            &oauth,
            &[],
        )
        .unwrap();
        assert_eq!(
            base,
            "GET&http%3A%2F%2Fapi.simplegeo.com%2F1.0%2Fcontext%2F37.8016%2C-122.4783.json&\
             oauth_consumer_key%3DMY_OAUTH_KEY%26oauth_nonce%3D12345678%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1300000000%26\
             oauth_version%3D1.0"
        );
    }

    #[test]
    fn test_get_signature_vector() {
        let header = signer()
            .authorization_header_with(
                Method::Get,
                "http://api.simplegeo.com:80/1.0/context/37.8016,-122.4783.json",
                &[],
                None,
                NONCE,
                TIMESTAMP,
            )
            .unwrap();
        assert_eq!(signature_of(&header), "BcmSP7Cy2KCSkt8a1VdhwLmDhx4=");
        assert!(header.starts_with("OAuth realm=\"http://api.simplegeo.com\", "));
        assert!(header.contains("oauth_consumer_key=\"MY_OAUTH_KEY\""));
        assert!(!header.contains("oauth_body_hash"));
    }

    #[test]
    fn test_query_parameters_are_signed() {
        let header = signer()
            .authorization_header_with(
                Method::Get,
                "http://api.simplegeo.com:80/1.0/places/37.8,-122.4.json?q=coffee%20shop&radius=5",
                &[],
                None,
                NONCE,
                TIMESTAMP,
            )
            .unwrap();
        assert_eq!(signature_of(&header), "/zDZ5JQX04aAiQWC97W8+oRpdtw=");
    }

    #[test]
    fn test_json_body_hash_is_signed() {
        let body = r#"{"type":"Feature"}"#;
        assert_eq!(body_hash(body), "GYUVq/zeW3Qe+Fjfs61fm1DETD0=");

        let header = signer()
            .authorization_header_with(
                Method::Post,
                "http://api.simplegeo.com:80/1.0/places",
                &[],
                Some(body),
                NONCE,
                TIMESTAMP,
            )
            .unwrap();
        assert_eq!(signature_of(&header), "tK79/JDu9L4Xgyns0qQHS1T9MaY=");
        assert!(header.contains("oauth_body_hash=\"GYUVq%2FzeW3Qe%2BFjfs61fm1DETD0%3D\""));
    }

    #[test]
    fn test_generated_nonce_is_eight_digits() {
        let header = signer()
            .authorization_header(Method::Get, "http://api.simplegeo.com/1.0/layers.json", &[], None)
            .unwrap();
        let start = header.find("oauth_nonce=\"").unwrap() + "oauth_nonce=\"".len();
        let nonce: String = header[start..].chars().take_while(|c| *c != '"').collect();
        assert_eq!(nonce.len(), 8);
        assert!(nonce.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_invalid_url() {
        assert!(signature_base_string(Method::Get, "not a url", &[], &[]).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", signer());
        assert!(!rendered.contains("MY_SECRET_KEY"));
    }
}
