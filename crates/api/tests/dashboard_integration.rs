//! Integration tests for the dashboard routes
//!
//! Tests: profile and usage, listing, owner-only deletion, health

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::*;
use keyforge_control::{LicenseStatus, Plan};

async fn issue(app: &axum::Router, token: &str, plan: &str) -> String {
    let response = app
        .clone()
        .oneshot(create_key_request(Some(token), json!({"plan": plan})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await["license"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_profile_created_on_first_access() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(authed(Method::GET, "/api/v1/profile", &token("user-1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["profile"]["id"], "user-1");
    assert_eq!(body["profile"]["plan"], "free");
    assert_eq!(body["usage"]["total"], 0);
    assert_eq!(body["usage"]["limit"], 10);
    assert_eq!(body["usage"]["remaining"], 10);
}

#[tokio::test]
async fn test_profile_usage_counts() {
    let (app, control) = test_app().await;
    let token = token("user-1");

    issue(&app, &token, "free").await;
    let banned = issue(&app, &token, "pro").await;
    control
        .licenses()
        .set_status(&banned, LicenseStatus::Banned)
        .await
        .unwrap();

    let response = app
        .oneshot(authed(Method::GET, "/api/v1/profile", &token))
        .await
        .unwrap();
    let usage = &response_json(response).await["usage"];

    assert_eq!(usage["total"], 2);
    assert_eq!(usage["active"], 1);
    assert_eq!(usage["banned"], 1);
    assert_eq!(usage["remaining"], 8);
    assert_eq!(usage["by_plan"], json!({"free": 1, "pro": 1, "premium": 0}));
}

#[tokio::test]
async fn test_premium_profile_usage_is_unbounded() {
    let (app, control) = test_app().await;
    control.profiles().get_or_create("user-1", "").await.unwrap();
    control.profiles().set_plan("user-1", Plan::Premium).await.unwrap();

    let response = app
        .oneshot(authed(Method::GET, "/api/v1/profile", &token("user-1")))
        .await
        .unwrap();
    let usage = &response_json(response).await["usage"];

    assert!(usage["limit"].is_null());
    assert!(usage["remaining"].is_null());
}

#[tokio::test]
async fn test_list_own_licenses_only() {
    let (app, _) = test_app().await;
    let alice = token("alice");
    let bob = token("bob");

    issue(&app, &alice, "free").await;
    issue(&app, &alice, "pro").await;
    issue(&app, &bob, "free").await;

    let response = app
        .oneshot(authed(Method::GET, "/api/v1/licenses", &alice))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["count"], 2);
    let licenses = body["licenses"].as_array().unwrap();
    assert!(licenses.iter().all(|l| l["user_id"] == "alice"));
}

#[tokio::test]
async fn test_get_license_owner_only() {
    let (app, _) = test_app().await;
    let id = issue(&app, &token("alice"), "free").await;
    let uri = format!("/api/v1/licenses/{id}");

    let response = app
        .clone()
        .oneshot(authed(Method::GET, &uri, &token("alice")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["license"]["id"], id.as_str());

    let response = app
        .oneshot(authed(Method::GET, &uri, &token("bob")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_own_license() {
    let (app, control) = test_app().await;
    let alice = token("alice");
    let id = issue(&app, &alice, "free").await;
    let uri = format!("/api/v1/licenses/{id}");

    // Someone else's delete looks like a missing record
    let response = app
        .clone()
        .oneshot(authed(Method::DELETE, &uri, &token("bob")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response_json(response).await,
        json!({"success": false, "error": "License not found"})
    );
    assert!(control.licenses().get_by_id(&id).await.unwrap().is_some());

    let response = app
        .clone()
        .oneshot(authed(Method::DELETE, &uri, &alice))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"success": true}));
    assert!(control.licenses().get_by_id(&id).await.unwrap().is_none());

    let response = app
        .oneshot(authed(Method::DELETE, &uri, &alice))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_requires_auth() {
    let (app, _) = test_app().await;

    for uri in ["/api/v1/profile", "/api/v1/licenses"] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_cors(&response);
    }
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["uptime_secs"].is_u64());
}
