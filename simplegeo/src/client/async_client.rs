//! Async counterpart of [`Client`](super::Client).
//!
//! Covers the request primitive and the most used operations. Each call
//! suspends only while the transport is on the network; preparation,
//! classification and decoding happen synchronously around it.

use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use super::config::ClientConfig;
use super::context::validated_point;
use super::lock_meta;
use super::places::{features_from_collection, SearchOptions};
use super::storage::records_from_collection;
use crate::endpoint::EndpointTable;
use crate::error::{Error, Result};
use crate::http::{
    classify, AsyncHttpTransport, AsyncReqwestTransport, Body, Dispatcher, HttpResponse, Method,
    OAuthSigner, ResponseMeta,
};
use crate::models::{json_decode, Feature, Handle, ModelError, Record};

/// Non-blocking client for the SimpleGeo API.
pub struct AsyncClient<T: AsyncHttpTransport = AsyncReqwestTransport> {
    config: ClientConfig,
    endpoints: EndpointTable,
    dispatcher: Dispatcher,
    transport: T,
    last_response: Mutex<Option<ResponseMeta>>,
}

impl AsyncClient<AsyncReqwestTransport> {
    /// Async counterpart of [`Client::new`](super::Client::new).
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(key, secret))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = AsyncReqwestTransport::new(&config.transport_config())?;
        Self::with_transport(config, transport)
    }
}

impl<T: AsyncHttpTransport> AsyncClient<T> {
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

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// See [`Client::endpoint`](super::Client::endpoint).
    pub fn endpoint(&self, name: &str, args: &[(&str, &str)]) -> Result<String> {
        Ok(self.endpoints.url(
            &self.config.base_uri(),
            &self.config.api_version,
            name,
            args,
        )?)
    }

    /// Sends one signed request and classifies the response.
    /// See [`Client::request`](super::Client::request).
    pub async fn request(&self, url: &str, method: Method, body: Body) -> Result<HttpResponse> {
        let request = self.dispatcher.prepare(method, url, body)?;
        let response = self.transport.execute(&request).await?;
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

    async fn request_json(&self, url: &str, method: Method, body: Body) -> Result<Value> {
        let response = self.request(url, method, body).await?;
        Ok(json_decode(&response.body)?)
    }

    /// Fetches a feature by handle.
    pub async fn get_feature(&self, handle: &str) -> Result<Feature> {
        let handle = Handle::parse(handle)?;
        let url = self.endpoint("feature", &[("handle", handle.as_str())])?;
        let value = self.request_json(&url, Method::Get, Body::Empty).await?;
        Feature::from_dict(&value, false)?.ok_or_else(|| ModelError::MissingField("feature").into())
    }

    /// Stores a record, replacing any record with the same layer and id.
    pub async fn add_record(&self, record: &Record) -> Result<()> {
        let url = self.endpoint("record", &[("layer", record.layer()), ("id", record.id())])?;
        self.request(&url, Method::Put, Body::Json(record.to_json()))
            .await?;
        Ok(())
    }

    /// Fetches one record; `None` for a `null` or empty body.
    pub async fn get_record(&self, layer: &str, id: &str) -> Result<Option<Record>> {
        let url = self.endpoint("record", &[("layer", layer), ("id", id)])?;
        let value = self.request_json(&url, Method::Get, Body::Empty).await?;
        Ok(Record::from_dict(&value)?)
    }

    pub async fn get_records<S: AsRef<str>>(&self, layer: &str, ids: &[S]) -> Result<Vec<Record>> {
        if ids.is_empty() {
            return Err(Error::invalid_argument("at least one record id is required"));
        }
        let ids = ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let url = self.endpoint("records", &[("layer", layer), ("ids", &ids)])?;
        let collection = self.request_json(&url, Method::Get, Body::Empty).await?;
        records_from_collection(&collection)
    }

    /// Context for a point.
    pub async fn get_context(&self, lat: f64, lon: f64) -> Result<Value> {
        let (lat, lon) = validated_point(lat, lon)?;
        let url = self.endpoint("context", &[("lat", &lat), ("lon", &lon)])?;
        self.request_json(&url, Method::Get, Body::Empty).await
    }

    pub async fn search(
        &self,
        lat: f64,
        lon: f64,
        options: &SearchOptions,
    ) -> Result<Vec<Feature>> {
        let (lat, lon) = validated_point(lat, lon)?;
        let params = options.to_params()?;
        let url = self.endpoint("search", &[("lat", &lat), ("lon", &lon)])?;
        let collection = self.request_json(&url, Method::Get, params.into()).await?;
        features_from_collection(&collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockAsyncTransport;

    fn client(transport: MockAsyncTransport) -> AsyncClient<MockAsyncTransport> {
        AsyncClient::with_transport(ClientConfig::new("key", "secret"), transport).unwrap()
    }

    #[tokio::test]
    async fn test_get_context() {
        let client = client(MockAsyncTransport::new().respond(200, r#"{"features": []}"#));
        let context = client.get_context(37.8016, -122.4783).await.unwrap();

        assert_eq!(context["features"], serde_json::json!([]));
        assert_eq!(
            client.transport().last_request().url,
            "http://api.simplegeo.com:80/1.0/context/37.8016,-122.4783.json"
        );
        assert_eq!(client.most_recent_http_headers().unwrap().status, 200);
    }

    #[tokio::test]
    async fn test_error_status_matches_blocking_client() {
        let client = client(MockAsyncTransport::new().respond(500, "internal error"));
        let err = client.get_record("layer", "1").await.unwrap_err();

        let api = err.api_error().unwrap();
        assert_eq!(api.code, Some(500));
        assert_eq!(api.message, "internal error");
        assert_eq!(client.most_recent_http_headers().unwrap().status, 500);
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = client(MockAsyncTransport::new().fail("timed out"));
        let err = client.get_context(0.0, 0.0).await.unwrap_err();
        assert_eq!(err.api_error().unwrap().code, None);
    }

    #[tokio::test]
    async fn test_record_round_trip() {
        let record = Record::new("com.example.test", "42", "37.80".parse().unwrap(), "-122.47".parse().unwrap())
            .unwrap();
        let client = client(
            MockAsyncTransport::new()
                .respond(202, "")
                .respond(200, &record.to_json()),
        );

        client.add_record(&record).await.unwrap();
        assert_eq!(client.transport().last_request().method, Method::Put);

        let fetched = client
            .get_record("com.example.test", "42")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.lon().to_string(), "-122.47");
    }

    #[tokio::test]
    async fn test_search_and_bad_handle() {
        let client = client(MockAsyncTransport::new().respond(200, r#"{"features": []}"#));
        let found = client
            .search(37.8, -122.4, &SearchOptions::new().query("pizza"))
            .await
            .unwrap();
        assert!(found.is_empty());
        assert!(client
            .transport()
            .last_request()
            .url
            .ends_with("?q=pizza"));

        assert!(client.get_feature("SG_short").await.is_err());
        assert!(client.get_records::<&str>("layer", &[]).await.is_err());
    }
}
