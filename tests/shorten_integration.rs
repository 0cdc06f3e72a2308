//! Shorten endpoint integration tests
//!
//! These tests drive the full router with an in-memory SQLite store and
//! verify deduplication, code allocation, API key enforcement, and the
//! concurrent exactly-one-winner property.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use shortlinks::api;
use shortlinks::config::Config;
use shortlinks::shortener::{Shortener, CODE_ALPHABET};
use shortlinks::storage::{LinkStore, SqliteStore};
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to create test storage
async fn create_test_storage() -> Arc<dyn LinkStore> {
    let storage = SqliteStore::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

/// Helper to create test config
fn create_test_config(api_key: &str, code_length: usize) -> Arc<Config> {
    Arc::new(Config {
        domain: String::new(),
        base_path: "/".to_string(),
        port: 8080,
        db_path: String::new(),
        code_length,
        api_key: api_key.to_string(),
    })
}

fn build_app(storage: Arc<dyn LinkStore>, config: Arc<Config>) -> Router {
    let shortener = Shortener::new(storage, config.code_length);
    api::create_router(shortener, config)
}

fn shorten_request(url: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/shorten")
        .header("content-type", "application/json")
        .header("host", "sho.rt")
        .body(Body::from(format!(r#"{{"url": "{url}"}}"#)))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_shorten_creates_new_link() {
    let storage = create_test_storage().await;
    let app = build_app(storage.clone(), create_test_config("", 4));

    let response = app.oneshot(shorten_request("example.com/a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let code = body["code"].as_str().unwrap();

    assert_eq!(code.len(), 4);
    let alphabet: HashSet<char> = CODE_ALPHABET.iter().map(|b| *b as char).collect();
    assert!(code.chars().all(|c| alphabet.contains(&c)));

    assert_eq!(body["url"], "//example.com/a");
    assert_eq!(body["visit_count"], 0);
    assert_eq!(
        body["short_url"].as_str().unwrap(),
        format!("http://sho.rt/{code}")
    );

    // The record is actually persisted under the normalized URL
    let stored = storage.find_by_url("//example.com/a").await.unwrap().unwrap();
    assert_eq!(stored.code, code);
}

#[tokio::test]
async fn test_shorten_same_url_twice_returns_same_code() {
    let storage = create_test_storage().await;
    let app = build_app(storage.clone(), create_test_config("", 4));

    let first = app
        .clone()
        .oneshot(shorten_request("example.com/page"))
        .await
        .unwrap();
    let second = app
        .oneshot(shorten_request("example.com/page"))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let first = body_json(first).await;
    let second = body_json(second).await;
    assert_eq!(first["code"], second["code"]);
}

#[tokio::test]
async fn test_shorten_explicit_scheme_stays_distinct() {
    let storage = create_test_storage().await;
    let app = build_app(storage.clone(), create_test_config("", 4));

    let bare = app
        .clone()
        .oneshot(shorten_request("example.com/a"))
        .await
        .unwrap();
    let schemed = app
        .oneshot(shorten_request("http://example.com/a"))
        .await
        .unwrap();

    let bare = body_json(bare).await;
    let schemed = body_json(schemed).await;

    // Different normalized URLs, different codes
    assert_ne!(bare["code"], schemed["code"]);
    assert_eq!(bare["url"], "//example.com/a");
    assert_eq!(schemed["url"], "http://example.com/a");

    assert!(storage.find_by_url("//example.com/a").await.unwrap().is_some());
    assert!(storage
        .find_by_url("http://example.com/a")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_shorten_empty_url_is_rejected() {
    let storage = create_test_storage().await;
    let app = build_app(storage, create_test_config("", 4));

    let response = app.oneshot(shorten_request("   ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_shorten_respects_configured_code_length() {
    let storage = create_test_storage().await;
    let app = build_app(storage, create_test_config("", 10));

    let response = app.oneshot(shorten_request("example.com")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["code"].as_str().unwrap().len(), 10);
}

#[tokio::test]
async fn test_concurrent_shorten_same_new_url_yields_one_code() {
    let storage = create_test_storage().await;
    let app = build_app(storage.clone(), create_test_config("", 4));

    let mut handles = vec![];
    for _ in 0..10 {
        let app_clone = app.clone();
        handles.push(tokio::spawn(async move {
            app_clone
                .oneshot(shorten_request("example.com/fresh"))
                .await
                .unwrap()
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        let response = handle.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        codes.insert(body["code"].as_str().unwrap().to_string());
    }

    assert_eq!(codes.len(), 1, "all callers must see the same code");

    // Exactly one record exists for the URL
    let stored = storage
        .find_by_url("//example.com/fresh")
        .await
        .unwrap()
        .unwrap();
    assert!(codes.contains(&stored.code));
}

#[tokio::test]
async fn test_health_endpoint() {
    let storage = create_test_storage().await;
    let app = build_app(storage, create_test_config("", 4));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_shorten_without_key_is_unauthorized() {
    let storage = create_test_storage().await;
    let app = build_app(storage, create_test_config("secret", 4));

    let response = app.oneshot(shorten_request("example.com")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shorten_with_wrong_key_is_unauthorized() {
    let storage = create_test_storage().await;
    let app = build_app(storage, create_test_config("secret", 4));

    let mut request = shorten_request("example.com");
    request
        .headers_mut()
        .insert("X-API-Key", "not-secret".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shorten_with_x_api_key_succeeds() {
    let storage = create_test_storage().await;
    let app = build_app(storage, create_test_config("secret", 4));

    let mut request = shorten_request("example.com");
    request
        .headers_mut()
        .insert("X-API-Key", "secret".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_shorten_with_bearer_token_succeeds() {
    let storage = create_test_storage().await;
    let app = build_app(storage, create_test_config("secret", 4));

    let mut request = shorten_request("example.com");
    request
        .headers_mut()
        .insert("Authorization", "Bearer secret".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_not_protected_by_api_key() {
    let storage = create_test_storage().await;
    let app = build_app(storage, create_test_config("secret", 4));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
