use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::metrics::track_db_health_check;
use crate::state::AppState;

pub const DB_OK_MESSAGE: &str = "Database connected successfully";
pub const DB_ERROR_MESSAGE: &str = "Database error";

/// Probe the database connection
#[utoipa::path(
    get,
    path = "/test-db",
    responses(
        (status = 200, description = "Database reachable", body = String, content_type = "text/plain"),
        (status = 500, description = "Database unreachable", body = String, content_type = "text/plain")
    ),
    tag = "Health"
)]
#[instrument(skip(state))]
pub async fn test_db(State(state): State<AppState>) -> (StatusCode, &'static str) {
    let healthy = state.pool_manager.test_connection().await;
    track_db_health_check(healthy);

    if healthy {
        (StatusCode::OK, DB_OK_MESSAGE)
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, DB_ERROR_MESSAGE)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

/// Service health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "Health"
)]
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = state.pool_manager.test_connection().await;
    track_db_health_check(healthy);

    let (status, body) = if healthy {
        (
            StatusCode::OK,
            HealthResponse {
                status: "ok",
                database: "up",
                version: env!("CARGO_PKG_VERSION"),
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "degraded",
                database: "down",
                version: env!("CARGO_PKG_VERSION"),
            },
        )
    };

    (status, Json(body))
}
