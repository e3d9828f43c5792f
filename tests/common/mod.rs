//! Shared test helpers

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

use tournament_ledger::api::{build_router, RequestTimeout, ServiceHandle};
use tournament_ledger::service::Ledger;
use tournament_ledger::store::MemoryStore;

/// Fresh app over empty in-memory stores.
pub fn test_app() -> Router {
    let service: ServiceHandle = Arc::new(Ledger::new(MemoryStore::new(), MemoryStore::new()));
    build_router(service, RequestTimeout(Duration::from_secs(5)))
}

pub async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> Response<Body> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

pub async fn send_empty(app: &Router, method: &str, uri: &str) -> Response<Body> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST a JSON body and decode the `{"id"}` envelope, asserting 200.
pub async fn create_entity(app: &Router, uri: &str, body: Value) -> String {
    let response = send_json(app, "POST", uri, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["id"].as_str().expect("id in response").to_string()
}
