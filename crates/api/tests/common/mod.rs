//! Shared helpers for API integration tests

#![allow(dead_code)]


use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use serde_json::{Value, json};

use keyforge_api::{AppState, build_router};
use keyforge_auth::{LocalJwtProvider, test_utils};
use keyforge_control::ControlPlane;
use keyforge_license::QuotaPolicy;

pub async fn test_control() -> Arc<ControlPlane> {
    Arc::new(ControlPlane::new_memory().await.unwrap())
}

pub fn local_identity() -> Arc<LocalJwtProvider> {
    Arc::new(LocalJwtProvider::new(test_utils::TEST_SECRET))
}

pub async fn test_app() -> (Router, Arc<ControlPlane>) {
    let control = test_control().await;
    let state = AppState::new(local_identity(), Arc::clone(&control), QuotaPolicy::default());
    (build_router(state), control)
}

pub fn token(user_id: &str) -> String {
    test_utils::create_test_token(user_id, &format!("{user_id}@example.com"))
}

pub fn create_key_request(token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/functions/v1/create-key")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn authed(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(json!({}))
}

pub fn assert_cors(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-headers"],
        "authorization, x-client-info, apikey, content-type"
    );
    assert_eq!(
        headers["access-control-allow-methods"],
        "POST, GET, DELETE, OPTIONS"
    );
}
