use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Response};
use ecotrack::state::AppState;
use ecotrack_config::{
    CorsConfig, DatabaseConfig, EmailConfig, JwtConfig, OtpConfig, RateLimitConfig,
};
use ecotrack_db::{PoolManager, initialize_schema};
use http_body_util::BodyExt;
use serde_json::Value;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes";

#[allow(dead_code)]
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry: 3600,
        cookie_secure: false,
    }
}

/// Generous limits so only the rate limit tests ever hit them.
#[allow(dead_code)]
pub fn relaxed_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        general_per_second: 1000,
        general_burst_size: 1000,
        auth_per_second: 1000,
        auth_burst_size: 1000,
        trusted_proxies: Vec::new(),
    }
}

/// Attaches the peer address the server would record for a real socket.
#[allow(dead_code)]
pub fn from_peer(mut request: Request<Body>, ip: &str) -> Request<Body> {
    let addr = SocketAddr::new(ip.parse().unwrap(), 40000);
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

#[allow(dead_code)]
/// Nothing listens on port 1, so every connect attempt is refused.
pub fn unreachable_db_config() -> DatabaseConfig {
    DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        acquire_timeout: Duration::from_secs(1),
        ..DatabaseConfig::default()
    }
}

#[allow(dead_code)]
pub async fn build_state(
    pool_manager: Arc<PoolManager>,
    rate_limit_config: RateLimitConfig,
) -> AppState {
    let db = pool_manager.get().await.unwrap().clone();
    AppState {
        db,
        pool_manager,
        jwt_config: test_jwt_config(),
        email_config: EmailConfig::from_lookup(|_| None),
        otp_config: OtpConfig::from_lookup(|_| None),
        cors_config: CorsConfig::from_lookup(|_| None),
        rate_limit_config,
    }
}

/// State over a lazy pool pointing at a closed port: routes that never touch
/// the database work, and the ones that do fail fast.
#[allow(dead_code)]
pub async fn unreachable_state(rate_limit_config: RateLimitConfig) -> AppState {
    let manager = Arc::new(PoolManager::lazy(unreachable_db_config()));
    build_state(manager, rate_limit_config).await
}

/// State over the MySQL server described by `DB_*`, with the schema applied.
#[allow(dead_code)]
pub async fn live_state() -> AppState {
    dotenvy::dotenv().ok();
    let config = DatabaseConfig::from_env();
    initialize_schema(&config, std::path::Path::new("db/schema.sql"))
        .await
        .unwrap();
    let manager = Arc::new(PoolManager::new(config));
    build_state(manager, relaxed_rate_limit_config()).await
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
