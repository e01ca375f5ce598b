//! Integration tests for the storage workflow.
//!
//! These tests drive a real `Client` against an in-memory fake of the
//! storage service:
//! - Record add → fetch, checking the wire coordinate order
//! - Batch upload against the server's batch cap
//! - Error classification for missing records
//!
//! Run with: `cargo test --test storage_workflow`

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use simplegeo::http::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use simplegeo::{Client, ClientConfig, Error, Record};

// ============================================================================
// Test Helpers
// ============================================================================

const LAYER: &str = "com.example.workflow";
const BATCH_CAP: usize = 100;

/// Stores records by (layer, id) and serves them back.
#[derive(Default)]
struct FakeApi {
    records: Mutex<HashMap<(String, String), String>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl FakeApi {
    fn sent_bodies(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r.body.clone())
            .collect()
    }
}

impl HttpTransport for FakeApi {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());

        let path = request
            .url
            .split("/1.0/records/")
            .nth(1)
            .and_then(|p| p.strip_suffix(".json"))
            .ok_or_else(|| TransportError::Request(format!("unexpected url {}", request.url)))?;

        let response = match (request.method, path.split_once('/')) {
            (Method::Put, Some((layer, id))) => {
                let body = request.body.clone().unwrap_or_default();
                self.records
                    .lock()
                    .unwrap()
                    .insert((layer.to_string(), id.to_string()), body);
                HttpResponse::new(202, "")
            }
            (Method::Get, Some((layer, id))) => {
                match self
                    .records
                    .lock()
                    .unwrap()
                    .get(&(layer.to_string(), id.to_string()))
                {
                    Some(body) => HttpResponse::new(200, body.clone()),
                    None => HttpResponse::new(404, r#"{"code": 404, "message": "No such record."}"#),
                }
            }
            (Method::Delete, Some((layer, id))) => {
                self.records
                    .lock()
                    .unwrap()
                    .remove(&(layer.to_string(), id.to_string()));
                HttpResponse::new(204, "")
            }
            (Method::Post, None) => {
                let body: Value =
                    serde_json::from_str(request.body.as_deref().unwrap_or("{}")).unwrap();
                let count = body["features"].as_array().map_or(0, Vec::len);
                if count > BATCH_CAP {
                    HttpResponse::new(
                        400,
                        format!(r#"{{"code": 400, "message": "Maximum of {} records"}}"#, BATCH_CAP),
                    )
                } else {
                    HttpResponse::new(202, "")
                }
            }
            _ => HttpResponse::new(405, "method not allowed"),
        };
        Ok(response.with_header("Content-Type", "application/json"))
    }
}

fn client() -> Client<FakeApi> {
    Client::with_transport(ClientConfig::new("key", "secret"), FakeApi::default()).unwrap()
}

fn record(id: &str) -> Record {
    Record::new(LAYER, id, "37.80".parse().unwrap(), "-122.47".parse().unwrap()).unwrap()
}

// ============================================================================
// Workflow Tests
// ============================================================================

#[test]
fn test_add_then_fetch_record() {
    let client = client();
    let storage = client.storage();

    storage
        .add_record(&record("42").with_property("name", "Golden Gate").unwrap())
        .unwrap();

    let bodies = client.transport().sent_bodies();
    let wire: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(wire["geometry"]["coordinates"].to_string(), "[-122.47,37.80]");
    assert_eq!(wire["properties"]["layer"], LAYER);

    let fetched = storage.get_record(LAYER, "42").unwrap().unwrap();
    assert_eq!(fetched.lat().as_f64(), 37.80);
    assert_eq!(fetched.lon().as_f64(), -122.47);
    assert_eq!(fetched.lat().to_string(), "37.80");
    assert_eq!(fetched.property("name"), Some(&Value::from("Golden Gate")));
    assert_eq!(fetched, record("42"));
}

#[test]
fn test_batch_over_cap_is_rejected() {
    let client = client();
    let batch: Vec<Record> = (0..=BATCH_CAP).map(|i| record(&i.to_string())).collect();
    assert_eq!(batch.len(), 101);

    let err = client.storage().add_records(LAYER, &batch).unwrap_err();
    let api = err.api_error().unwrap();
    assert_eq!(api.code, Some(400));
    assert_eq!(api.description.as_deref(), Some("Maximum of 100 records"));

    client
        .storage()
        .add_records(LAYER, &batch[..BATCH_CAP])
        .unwrap();
}

#[test]
fn test_missing_record_is_api_error() {
    let client = client();
    let err = client.storage().get_record(LAYER, "nope").unwrap_err();

    match err {
        Error::Api(api) => {
            assert_eq!(api.code, Some(404));
            assert!(api.message.contains("No such record."));
            let headers = api.headers.unwrap();
            assert_eq!(
                headers.get("content-type").map(String::as_str),
                Some("application/json")
            );
        }
        other => panic!("Expected Api error, got {:?}", other),
    }

    let meta = client.most_recent_http_headers().unwrap();
    assert_eq!(meta.status, 404);
}

#[test]
fn test_delete_then_fetch() {
    let client = client();
    client.storage().add_record(&record("7")).unwrap();
    assert!(client.storage().get_record(LAYER, "7").unwrap().is_some());

    client.storage().delete_record(LAYER, "7").unwrap();
    let err = client.storage().get_record(LAYER, "7").unwrap_err();
    assert_eq!(err.code(), Some(404));
}
