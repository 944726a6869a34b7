mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ecotrack::router::init_router;
use ecotrack_config::RateLimitConfig;
use common::{body_json, from_peer, json_request, unreachable_state};
use serde_json::json;
use tower::ServiceExt;

const PROXY: &str = "10.0.0.1";

fn strict_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        general_per_second: 1,
        general_burst_size: 3,
        auth_per_second: 1,
        auth_burst_size: 2,
        trusted_proxies: Vec::new(),
    }
}

fn behind_proxy_config() -> RateLimitConfig {
    RateLimitConfig {
        trusted_proxies: vec![PROXY.parse().unwrap()],
        ..strict_rate_limit_config()
    }
}

// Rejected by validation before any database access
fn invalid_login(peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let mut request = json_request(
        "POST",
        "/api/auth/login",
        json!({ "email": "not-an-email", "password": "x" }),
    );
    if let Some(value) = forwarded_for {
        request
            .headers_mut()
            .insert("x-forwarded-for", value.parse().unwrap());
    }
    from_peer(request, peer)
}

#[tokio::test]
async fn test_auth_rate_limit_exceeded() {
    let app = init_router(unreachable_state(strict_rate_limit_config()).await);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(invalid_login("192.168.1.100", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let response = app
        .clone()
        .oneshot(invalid_login("192.168.1.100", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Too many requests"));
}

#[tokio::test]
async fn test_rate_limit_is_per_client() {
    let app = init_router(unreachable_state(strict_rate_limit_config()).await);

    for _ in 0..3 {
        app.clone()
            .oneshot(invalid_login("192.168.1.100", None))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(invalid_login("10.1.1.1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_spoofed_forwarded_for_does_not_reset_limit() {
    let app = init_router(unreachable_state(strict_rate_limit_config()).await);

    let mut passed = 0;
    for i in 0..20 {
        let spoofed = format!("203.0.113.{i}");
        let response = app
            .clone()
            .oneshot(invalid_login("192.168.1.100", Some(spoofed.as_str())))
            .await
            .unwrap();
        if response.status() != StatusCode::TOO_MANY_REQUESTS {
            passed += 1;
        }
    }
    assert_eq!(passed, 2);
}

#[tokio::test]
async fn test_trusted_proxy_forwards_client_address() {
    let app = init_router(unreachable_state(behind_proxy_config()).await);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(invalid_login(PROXY, Some("203.0.113.1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
    let response = app
        .clone()
        .oneshot(invalid_login(PROXY, Some("203.0.113.1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // A different client behind the same proxy has its own bucket
    let response = app
        .oneshot(invalid_login(PROXY, Some("203.0.113.2")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_docs_routes_are_not_rate_limited() {
    let app = init_router(unreachable_state(strict_rate_limit_config()).await);

    for _ in 0..5 {
        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();
        let response = app
            .clone()
            .oneshot(from_peer(request, "192.168.1.100"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
