#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::Mutex;
use tower::ServiceExt;

use vendorhub_api::config::ServerConfig;
use vendorhub_api::router::build_app_router;
use vendorhub_api::state::AppState;
use vendorhub_engine::memory::{MemoryContractStore, MemoryDocumentStore, StaticVendorDirectory};
use vendorhub_engine::ContractEngine;
use vendorhub_events::BroadcastNotifier;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        document_dir: std::env::temp_dir().join("vendorhub-api-tests"),
        document_base_url: "http://localhost/documents".to_string(),
        max_upload_bytes: 1024 * 1024,
        expiry_window_days: 30,
        seed_vendor_names: Vec::new(),
    }
}

/// Handles to the in-memory collaborators behind a test app.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryContractStore>,
    pub documents: Arc<MemoryDocumentStore>,
    pub notifier: Arc<BroadcastNotifier>,
}

/// Build the full application router over in-memory storage.
pub fn build_test_app() -> TestApp {
    build_test_app_with_documents(MemoryDocumentStore::new())
}

pub fn build_test_app_with_documents(documents: MemoryDocumentStore) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryContractStore::new());
    let documents = Arc::new(documents);

    let notifier = Arc::new(BroadcastNotifier::default());

    let engine =
        ContractEngine::new(store.clone(), documents.clone()).with_notifier(notifier.clone());
    let state = AppState {
        engine: Arc::new(Mutex::new(engine)),
        vendors: Arc::new(StaticVendorDirectory::new([
            "Globex",
            "Acme Staffing",
            " Acme Staffing ",
            "",
        ])),
        pool: None,
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        documents,
        notifier,
    }
}

/// A valid creation payload. Dates are far in the past and future so the
/// derived status does not depend on the current date.
pub fn contract_payload() -> serde_json::Value {
    serde_json::json!({
        "vendorName": "Acme Staffing",
        "title": "Engineering staff augmentation",
        "type": "SOW",
        "value": 48000.0,
        "startDate": "2020-01-01",
        "endDate": "2099-12-31",
        "scope": "Two contract engineers",
        "companySigner": "Dana Lee",
        "vendorSigner": "Sam Ortiz"
    })
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    actor: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(actor) = actor {
        builder = builder.header("x-actor", actor);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body, None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body, None).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a single-file multipart form.
pub async fn post_file(
    app: Router,
    uri: &str,
    field: &str,
    file_name: &str,
    bytes: &[u8],
) -> Response<Body> {
    let boundary = "vendorhub-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Create a contract through the API and return its JSON.
pub async fn create_contract(app: Router, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app, "/api/v1/contracts", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
