//! Origin policy.
//!
//! Two layers cooperate: [`enforce_origin`] rejects requests whose `Origin`
//! is not allow-listed before they reach a handler, and [`cors_layer`] adds
//! the CORS response headers (and answers preflights) for allowed origins.
//! Requests without an `Origin` header (curl, server-to-server) pass through.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use ecotrack_config::CorsConfig;
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::metrics::track_origin_rejected;

pub const CORS_REJECTION_MESSAGE: &str = "CORS not allowed";

pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        // A wildcard cannot be combined with credentials
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub async fn enforce_origin(
    State(config): State<Arc<CorsConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let rejected_origin = match req.headers().get(header::ORIGIN) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(origin) if config.is_origin_allowed(Some(origin)) => None,
            Ok(origin) => Some(origin.to_string()),
            Err(_) => Some("<non-utf8>".to_string()),
        },
    };

    if let Some(origin) = rejected_origin {
        warn!(origin = %origin, "CORS blocked origin");
        track_origin_rejected();
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": CORS_REJECTION_MESSAGE })),
        )
            .into_response();
    }

    next.run(req).await
}
