//! HTTP transport abstraction for testability

use std::future::Future;
use std::path::{Path, PathBuf};

use reqwest::header::HeaderMap;
use reqwest::Certificate;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::types::{HttpRequest, HttpResponse, TransportConfig};
use crate::error::{ApiError, Error, ResponseHeaders};

/// Failures below the HTTP status level.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to create HTTP client: {0}")]
    Build(String),

    #[error("Could not read CA bundle {path}: {source}")]
    CaBundle {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CA bundle {path}: {reason}")]
    InvalidCaBundle { path: PathBuf, reason: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response: {0}")]
    Body(String),
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::transport(e.to_string())
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Api(e.into())
    }
}

/// Sends a prepared request and buffers the response.
///
/// Implementations report every received response, whatever its status;
/// classification happens in the dispatcher.
///
/// This abstraction lets the client run against a scripted transport in
/// tests.
pub trait HttpTransport: Send + Sync {
    /// Sends one signed request.
    ///
    /// # Arguments
    ///
    /// * `request` - Fully prepared request: URL, method, headers and body
    ///
    /// # Returns
    ///
    /// The buffered response for any HTTP status, or a [`TransportError`]
    /// when no response was received.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Asynchronous counterpart of [`HttpTransport`].
pub trait AsyncHttpTransport: Send + Sync {
    /// Sends one signed request without blocking the runtime.
    ///
    /// # Arguments
    ///
    /// * `request` - Fully prepared request: URL, method, headers and body
    ///
    /// # Returns
    ///
    /// The buffered response for any HTTP status, or a [`TransportError`]
    /// when no response was received.
    fn execute(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>, TransportError> {
    let pem = std::fs::read(path).map_err(|source| TransportError::CaBundle {
        path: path.to_path_buf(),
        source,
    })?;
    let certs =
        Certificate::from_pem_bundle(&pem).map_err(|e| TransportError::InvalidCaBundle {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if certs.is_empty() {
        return Err(TransportError::InvalidCaBundle {
            path: path.to_path_buf(),
            reason: "no certificates found".to_string(),
        });
    }
    Ok(certs)
}

fn collect_headers(map: &HeaderMap) -> ResponseHeaders {
    let mut headers = ResponseHeaders::new();
    for (name, value) in map {
        let Ok(value) = value.to_str() else {
            continue;
        };
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    headers
}

/// Blocking transport using reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a blocking transport.
    ///
    /// # Arguments
    ///
    /// * `config` - Timeout and optional CA bundle
    ///
    /// # Returns
    ///
    /// The transport, or an error if the CA bundle cannot be loaded or the
    /// reqwest client cannot be built.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(config.timeout);
        if let Some(path) = &config.ca_certs {
            builder = builder.tls_built_in_root_certs(false).https_only(true);
            for cert in load_ca_bundle(path)? {
                builder = builder.add_root_certificate(cert);
            }
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(|e| {
            warn!(
                url = %request.url,
                error = %e,
                is_connect = e.is_connect(),
                is_timeout = e.is_timeout(),
                "HTTP request failed"
            );
            TransportError::Request(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;
        trace!(url = %request.url, status, bytes = body.len(), "HTTP response body read");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Async transport using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestTransport {
    client: reqwest::Client,
}

impl AsyncReqwestTransport {
    /// Creates a non-blocking transport with the same options as
    /// [`ReqwestTransport::new`].
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(path) = &config.ca_certs {
            builder = builder.tls_built_in_root_certs(false).https_only(true);
            for cert in load_ca_bundle(path)? {
                builder = builder.add_root_certificate(cert);
            }
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpTransport for AsyncReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = match builder.send().await {
            Ok(resp) => {
                debug!(
                    url = %request.url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = %request.url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(TransportError::Request(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        match response.text().await {
            Ok(body) => {
                trace!(url = %request.url, bytes = body.len(), "HTTP response body read");
                Ok(HttpResponse {
                    status,
                    headers,
                    body,
                })
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "Failed to read response body");
                Err(TransportError::Body(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::http::Method;

    type Reply = Result<HttpResponse, TransportError>;

    /// Replays queued responses and records every request it receives.
    #[derive(Default)]
    pub struct MockTransport {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.push(Ok(HttpResponse::new(status, body)))
        }

        pub fn respond_with(self, response: HttpResponse) -> Self {
            self.push(Ok(response))
        }

        pub fn fail(self, message: &str) -> Self {
            self.push(Err(TransportError::Request(message.to_string())))
        }

        fn push(self, reply: Reply) -> Self {
            self.replies.lock().unwrap().push_back(reply);
            self
        }

        fn next(&self, request: &HttpRequest) -> Reply {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Request("no reply queued".to_string())))
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last_request(&self) -> HttpRequest {
            self.requests
                .lock()
                .unwrap()
                .last()
                .cloned()
                .expect("no request was sent")
        }
    }

    impl HttpTransport for MockTransport {
        fn execute(&self, request: &HttpRequest) -> Reply {
            self.next(request)
        }
    }

    /// Async mock sharing the same replay behavior.
    #[derive(Default)]
    pub struct MockAsyncTransport {
        inner: MockTransport,
    }

    impl MockAsyncTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            Self {
                inner: self.inner.respond(status, body),
            }
        }

        pub fn fail(self, message: &str) -> Self {
            Self {
                inner: self.inner.fail(message),
            }
        }

        pub fn last_request(&self) -> HttpRequest {
            self.inner.last_request()
        }
    }

    impl AsyncHttpTransport for MockAsyncTransport {
        async fn execute(&self, request: &HttpRequest) -> Reply {
            self.inner.next(request)
        }
    }

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn test_mock_replays_in_order() {
        let mock = MockTransport::new().respond(200, "first").respond(404, "second");

        assert_eq!(mock.execute(&get("http://a")).unwrap().body, "first");
        assert_eq!(mock.execute(&get("http://b")).unwrap().status, 404);
        assert!(mock.execute(&get("http://c")).is_err());
        assert_eq!(mock.requests().len(), 3);
        assert_eq!(mock.last_request().url, "http://c");
    }

    #[tokio::test]
    async fn test_mock_async_failure() {
        let mock = MockAsyncTransport::new().fail("connection refused");
        let err = mock.execute(&get("http://a")).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed: connection refused");
    }

    #[test]
    fn test_transport_error_becomes_api_error_without_code() {
        let api: ApiError = TransportError::Request("timed out".to_string()).into();
        assert_eq!(api.code, None);
        assert_eq!(api.message, "Request failed: timed out");
    }

    #[test]
    fn test_missing_ca_bundle() {
        let config = TransportConfig {
            ca_certs: Some(PathBuf::from("/nonexistent/ca.pem")),
            ..Default::default()
        };
        assert!(matches!(
            ReqwestTransport::new(&config),
            Err(TransportError::CaBundle { .. })
        ));
    }

    #[test]
    fn test_empty_ca_bundle() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ca.pem");
        std::fs::write(&path, "").unwrap();
        let config = TransportConfig {
            ca_certs: Some(path),
            ..Default::default()
        };
        assert!(matches!(
            AsyncReqwestTransport::new(&config),
            Err(TransportError::InvalidCaBundle { .. })
        ));
    }

    #[test]
    fn test_collect_headers_joins_duplicates() {
        let mut map = HeaderMap::new();
        map.append("x-rate", "1".parse().unwrap());
        map.append("x-rate", "2".parse().unwrap());
        map.insert("content-type", "application/json".parse().unwrap());

        let headers = collect_headers(&map);
        assert_eq!(headers.get("x-rate").map(String::as_str), Some("1, 2"));
        assert_eq!(
            headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }
}
