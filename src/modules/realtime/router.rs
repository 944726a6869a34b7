use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_feed, get_leaderboard, get_stats};

pub fn init_realtime_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/feed", get(get_feed))
        .route("/leaderboard", get(get_leaderboard))
}
