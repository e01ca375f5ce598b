//! SimpleGeo API client
//!
//! [`Client`] owns the credentials, the endpoint table and a transport. The
//! API families hang off it as borrowed views:
//!
//! ```text
//! Client ──┬── context()  ──► ContextApi   (context by point, IP, address)
//!          ├── places()   ──► PlacesApi    (feature CRUD and search)
//!          └── storage()  ──► StorageApi   (records and layers)
//! ```
//!
//! Feature lookup and annotations are shared by every family and live on
//! the client itself.
//!
//! # Example
//!
//! ```ignore
//! use simplegeo::Client;
//!
//! let client = Client::new("key", "secret")?;
//! let context = client.context().get_context(37.8016, -122.4783)?;
//! ```

mod async_client;
mod config;
mod context;
mod places;
mod storage;

pub use async_client::AsyncClient;
pub use config::ClientConfig;
pub use context::ContextApi;
pub use places::{PlacesApi, SearchOptions};
pub use storage::{NearbyOptions, NearbyTarget, StorageApi};

use std::sync::{Mutex, MutexGuard};

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::endpoint::EndpointTable;
use crate::error::{Error, Result};
use crate::http::{
    classify, Body, Dispatcher, HttpResponse, HttpTransport, Method, OAuthSigner,
    ReqwestTransport, ResponseMeta,
};
use crate::models::{json_decode, Feature, Handle, ModelError};

/// Blocking client for the SimpleGeo API.
///
/// Generic over the transport so tests can substitute a mock; the default
/// is [`ReqwestTransport`].
pub struct Client<T: HttpTransport = ReqwestTransport> {
    config: ClientConfig,
    endpoints: EndpointTable,
    dispatcher: Dispatcher,
    transport: T,
    last_response: Mutex<Option<ResponseMeta>>,
}

impl Client<ReqwestTransport> {
    /// Creates a client for the public API with default settings.
    ///
    /// # Arguments
    ///
    /// * `key` - OAuth consumer key
    /// * `secret` - OAuth consumer secret
    ///
    /// # Returns
    ///
    /// The client, or an error if the HTTP transport cannot be built.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(key, secret))
    }

    /// Creates a client from explicit settings (host, port, CA bundle,
    /// timeout) using the reqwest transport.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.transport_config())?;
        Self::with_transport(config, transport)
    }
}

impl<T: HttpTransport> Client<T> {
    /// Creates a client that sends requests through `transport`.
    ///
    /// # Arguments
    ///
    /// * `config` - Credentials and API location
    /// * `transport` - Sends signed requests; tests pass a mock here
    ///
    /// # Returns
    ///
    /// The client, or an error if the endpoint tables collide.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        let signer = OAuthSigner::new(&config.key, &config.secret, &config.realm);
        Ok(Self {
            endpoints: EndpointTable::standard()?,
            dispatcher: Dispatcher::new(signer),
            config,
            transport,
            last_response: Mutex::new(None),
        })
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The merged endpoint table.
    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves a named endpoint to an absolute URL.
    ///
    /// # Arguments
    ///
    /// * `name` - Endpoint name, e.g. `"record"`
    /// * `args` - Placeholder values, e.g. `[("layer", "com.example"), ("id", "42")]`
    ///
    /// # Returns
    ///
    /// The URL, or an endpoint error for an unknown name, a missing
    /// placeholder, or a value that is empty, `.` or `..`.
    pub fn endpoint(&self, name: &str, args: &[(&str, &str)]) -> Result<String> {
        Ok(self.endpoints.url(
            &self.config.base_uri(),
            &self.config.api_version,
            name,
            args,
        )?)
    }

    /// Sends one signed request and classifies the response.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL, usually from [`endpoint`](Self::endpoint)
    /// * `method` - HTTP method
    /// * `body` - Request body; JSON bodies are covered by `oauth_body_hash`
    ///
    /// # Returns
    ///
    /// The response when its status is 2xx or 3xx, otherwise an
    /// [`ApiError`](crate::ApiError) carrying the status, raw body and headers.
    ///
    /// The status and headers are remembered even when the status is an
    /// error; see [`most_recent_http_headers`](Self::most_recent_http_headers).
    pub fn request(&self, url: &str, method: Method, body: Body) -> Result<HttpResponse> {
        let request = self.dispatcher.prepare(method, url, body)?;
        let response = self.transport.execute(&request)?;
        debug!(
            method = %method,
            url = %url,
            status = response.status,
            "API response"
        );
        *lock_meta(&self.last_response) = Some(response.meta());
        Ok(classify(response)?)
    }

    /// Status and headers of the most recent response, if any arrived.
    pub fn most_recent_http_headers(&self) -> Option<ResponseMeta> {
        lock_meta(&self.last_response).clone()
    }

    pub(crate) fn request_json(&self, url: &str, method: Method, body: Body) -> Result<Value> {
        let response = self.request(url, method, body)?;
        Ok(json_decode(&response.body)?)
    }

    /// Fetches a feature by handle.
    pub fn get_feature(&self, handle: &str) -> Result<Feature> {
        let handle = Handle::parse(handle)?;
        let url = self.endpoint("feature", &[("handle", handle.as_str())])?;
        let value = self.request_json(&url, Method::Get, Body::Empty)?;
        Feature::from_dict(&value, false)?.ok_or_else(|| ModelError::MissingField("feature").into())
    }

    /// Fetches the annotations attached to a feature.
    pub fn get_annotations(&self, handle: &str) -> Result<Value> {
        let handle = Handle::parse(handle)?;
        let url = self.endpoint("annotations", &[("handle", handle.as_str())])?;
        self.request_json(&url, Method::Get, Body::Empty)
    }

    /// Attaches annotations to a feature.
    ///
    /// `annotations` maps a type name to a non-empty object of key/value
    /// pairs, e.g. `{"venue": {"capacity": "200"}}`.
    pub fn annotate(
        &self,
        handle: &str,
        annotations: &Map<String, Value>,
        private: bool,
    ) -> Result<Value> {
        let handle = Handle::parse(handle)?;
        validate_annotations(annotations)?;

        let url = self.endpoint("annotations", &[("handle", handle.as_str())])?;
        let body = json!({ "annotations": annotations, "private": private });
        self.request_json(&url, Method::Post, Body::json(&body))
    }

    /// Context lookups.
    pub fn context(&self) -> ContextApi<'_, T> {
        ContextApi::new(self)
    }

    /// Places feature management and search.
    pub fn places(&self) -> PlacesApi<'_, T> {
        PlacesApi::new(self)
    }

    /// Record and layer storage.
    pub fn storage(&self) -> StorageApi<'_, T> {
        StorageApi::new(self)
    }
}

pub(crate) fn lock_meta(
    slot: &Mutex<Option<ResponseMeta>>,
) -> MutexGuard<'_, Option<ResponseMeta>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn validate_annotations(annotations: &Map<String, Value>) -> Result<()> {
    if annotations.is_empty() {
        return Err(Error::invalid_argument("annotations must not be empty"));
    }
    for (kind, value) in annotations {
        match value {
            Value::Object(pairs) if !pairs.is_empty() => {}
            other => {
                return Err(Error::invalid_argument(format!(
                    "annotation {:?} must be a non-empty object, not: {}",
                    kind, other
                )))
            }
        }
    }
    Ok(())
}
