//! Request preparation and response classification.

use serde_json::Value;
use tracing::{debug, warn};

use super::oauth::OAuthSigner;
use super::types::{Body, HttpRequest, HttpResponse, Method};
use crate::error::{ApiError, Result};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Builds signed requests and classifies responses.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    signer: OAuthSigner,
    user_agent: String,
}

impl Dispatcher {
    pub fn new(signer: OAuthSigner) -> Self {
        Self {
            signer,
            user_agent: format!("SimpleGeo Rust Client v{}", crate::VERSION),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn signer(&self) -> &OAuthSigner {
        &self.signer
    }

    /// Builds and signs a request.
    ///
    /// Parameters go into the query string on `GET` and into a
    /// form-encoded body on every other method.
    pub fn prepare(&self, method: Method, url: &str, body: Body) -> Result<HttpRequest> {
        let mut url = url.to_string();
        let mut headers = Vec::with_capacity(3);
        let mut form_params: &[(String, String)] = &[];
        let mut json_body = None;

        let payload = match &body {
            Body::Empty => None,
            Body::Params(params) if method == Method::Get => {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&params.encode());
                None
            }
            Body::Params(params) => {
                form_params = params.pairs();
                headers.push(("Content-Type".to_string(), CONTENT_TYPE_FORM.to_string()));
                Some(params.encode())
            }
            Body::Json(text) => {
                json_body = Some(text.as_str());
                headers.push(("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()));
                Some(text.clone())
            }
        };

        let authorization = self
            .signer
            .authorization_header(method, &url, form_params, json_body)?;
        headers.push(("Authorization".to_string(), authorization));
        headers.push(("User-Agent".to_string(), self.user_agent.clone()));

        debug!(
            method = %method,
            url = %url,
            body_bytes = payload.as_ref().map_or(0, String::len),
            "Prepared API request"
        );

        Ok(HttpRequest {
            method,
            url,
            headers,
            body: payload,
        })
    }
}

/// Splits responses into successes (2xx and 3xx) and [`ApiError`]s.
///
/// The error message is the raw body. When the body is a JSON object with
/// a `message` string, that string becomes the description.
pub fn classify(response: HttpResponse) -> std::result::Result<HttpResponse, ApiError> {
    if (200..400).contains(&response.status) {
        return Ok(response);
    }

    warn!(status = response.status, "API returned error status");
    let description = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));

    Err(ApiError {
        code: Some(response.status),
        message: response.body,
        headers: Some(response.headers),
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::QueryParams;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(OAuthSigner::new("key", "secret", "http://api.simplegeo.com"))
    }

    #[test]
    fn test_get_params_become_query() {
        let request = dispatcher()
            .prepare(
                Method::Get,
                "http://api.simplegeo.com:80/1.0/places/1,2.json",
                Body::Params(QueryParams::new().with("q", "coffee shop").with("limit", 5)),
            )
            .unwrap();

        assert_eq!(
            request.url,
            "http://api.simplegeo.com:80/1.0/places/1,2.json?q=coffee%20shop&limit=5"
        );
        assert!(request.body.is_none());
        assert!(request.header("content-type").is_none());
    }

    #[test]
    fn test_post_params_become_form_body() {
        let request = dispatcher()
            .prepare(
                Method::Post,
                "http://api.simplegeo.com/1.0/x.json",
                Body::Params(QueryParams::new().with("a", "b c")),
            )
            .unwrap();

        assert_eq!(request.body.as_deref(), Some("a=b%20c"));
        assert_eq!(request.header("content-type"), Some(CONTENT_TYPE_FORM));
    }

    #[test]
    fn test_json_body_is_hashed() {
        let request = dispatcher()
            .prepare(
                Method::Put,
                "http://api.simplegeo.com/1.0/records/l/1.json",
                Body::Json("{}".to_string()),
            )
            .unwrap();

        assert_eq!(request.body.as_deref(), Some("{}"));
        assert_eq!(request.header("content-type"), Some(CONTENT_TYPE_JSON));
        assert!(request
            .header("authorization")
            .unwrap()
            .contains("oauth_body_hash=\""));
    }

    #[test]
    fn test_user_agent() {
        let request = dispatcher()
            .prepare(Method::Delete, "http://api.simplegeo.com/1.0/layers/x.json", Body::Empty)
            .unwrap();
        assert_eq!(
            request.header("user-agent"),
            Some(format!("SimpleGeo Rust Client v{}", crate::VERSION).as_str())
        );
        assert!(request.header("authorization").unwrap().starts_with("OAuth realm="));
    }

    #[test]
    fn test_classify_success_range() {
        assert!(classify(HttpResponse::new(200, "{}")).is_ok());
        assert!(classify(HttpResponse::new(202, "{}")).is_ok());
        assert!(classify(HttpResponse::new(301, "")).is_ok());
        assert!(classify(HttpResponse::new(199, "")).is_err());
        assert!(classify(HttpResponse::new(400, "")).is_err());
    }

    #[test]
    fn test_classify_error_keeps_body() {
        let body = r#"{"code": 404, "message": "No such record"}"#;
        let err = classify(HttpResponse::new(404, body).with_header("X-Id", "abc")).unwrap_err();

        assert_eq!(err.code, Some(404));
        assert_eq!(err.message, body);
        assert_eq!(err.description.as_deref(), Some("No such record"));
        assert_eq!(
            err.headers.unwrap().get("x-id").map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn test_classify_error_plain_body() {
        let err = classify(HttpResponse::new(500, "Internal Server Error")).unwrap_err();
        assert_eq!(err.message, "Internal Server Error");
        assert!(err.description.is_none());
    }
}
