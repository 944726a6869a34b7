use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{health, test_db};

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/test-db", get(test_db))
        .route("/health", get(health))
}
