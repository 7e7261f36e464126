//! End-to-end HTTP flow through the gateway router.
//!
//! Requests are driven in-process with `tower::ServiceExt::oneshot`; the
//! stores are the real in-memory and file-backed implementations.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use keylock_auth::{FileDigestStore, MemoryDigestStore, MemoryEphemeralStore};
use keylock_core::SecretString;
use keylock_gateway::Gateway;
use keylock_integration_tests::{keylock, test_config};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_full_token_lifecycle() {
    let config = test_config();
    let keylock = keylock(
        &config,
        Arc::new(MemoryDigestStore::new()),
        Arc::new(MemoryEphemeralStore::new()),
    );
    keylock
        .rotate_secret(&SecretString::new("hunter2"))
        .await
        .unwrap();
    let router = Gateway::new(config.gateway.clone(), keylock).router();

    let (status, body) = call(&router, get("/auth/keylength")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["keylength"], 7);

    let (status, body) = call(&router, get("/auth/token?key=hunter2")).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = call(&router, get(&format!("/info?token={token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Top-secret information!");

    tokio::time::advance(Duration::from_secs(config.tokens.ttl_secs)).await;

    let (status, body) = call(&router, get(&format!("/info?token={token}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad token");
}

#[tokio::test]
async fn test_rotation_over_http_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let config = test_config();
    let first = keylock(
        &config,
        Arc::new(FileDigestStore::new(dir.path())),
        Arc::new(MemoryEphemeralStore::new()),
    );
    first
        .rotate_secret(&SecretString::new("hunter2"))
        .await
        .unwrap();
    let router = Gateway::new(config.gateway.clone(), first).router();

    let (_, body) = call(&router, get("/auth/token?key=hunter2")).await;
    let token = body["token"].as_str().unwrap().to_string();

    let request = Request::post(format!("/auth/key?token={token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"key": "correct horse"}"#))
        .unwrap();
    let (status, body) = call(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Success!");

    // A second process sharing the storage dir sees the new key.
    let second = keylock(
        &config,
        Arc::new(FileDigestStore::new(dir.path())),
        Arc::new(MemoryEphemeralStore::new()),
    );
    assert!(second.verify("correcthorse").await.unwrap());
    assert!(!second.verify("hunter2").await.unwrap());
    assert_eq!(second.current_secret_length().await.unwrap(), 13);
}

#[tokio::test]
async fn test_tokens_are_not_shared_across_stores() {
    let config = test_config();
    let digests = Arc::new(MemoryDigestStore::new());
    let issuing = keylock(&config, digests.clone(), Arc::new(MemoryEphemeralStore::new()));
    let other = keylock(&config, digests, Arc::new(MemoryEphemeralStore::new()));
    issuing
        .rotate_secret(&SecretString::new("hunter2"))
        .await
        .unwrap();

    let token = issuing.issue_token("hunter2").await.unwrap().unwrap();
    assert!(issuing.is_token_valid(Some(token.as_str())).await.unwrap());
    assert!(!other.is_token_valid(Some(token.as_str())).await.unwrap());
    assert!(other.verify("hunter2").await.unwrap());
}

#[tokio::test]
async fn test_unconfigured_service() {
    let config = test_config();
    let keylock = keylock(
        &config,
        Arc::new(MemoryDigestStore::new()),
        Arc::new(MemoryEphemeralStore::new()),
    );
    let router = Gateway::new(config.gateway.clone(), keylock).router();

    let (status, body) = call(&router, get("/auth/token?key=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad key");

    let (status, _) = call(&router, get("/auth/keylength")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = call(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["credential"]["status"], "not_configured");
}
