use axum::Json;
use axum::extract::{Query, State};
use ecotrack_core::AppError;
use tracing::instrument;

use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;

use super::model::{FeedItem, FeedParams, LeaderboardParams, LeaderboardResponse, LiveStats};
use super::service::RealtimeService;

/// Site-wide activity over the last 24 hours
#[utoipa::path(
    get,
    path = "/api/realtime/stats",
    responses(
        (status = 200, description = "Live stats", body = LiveStats),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Realtime"
)]
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<LiveStats>, AppError> {
    Ok(Json(RealtimeService::get_stats(&state.db).await?))
}

/// Most recent entries across all users
#[utoipa::path(
    get,
    path = "/api/realtime/feed",
    params(FeedParams),
    responses(
        (status = 200, description = "Recent entries, newest first", body = Vec<FeedItem>)
    ),
    tag = "Realtime"
)]
#[instrument(skip(state))]
pub async fn get_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<FeedItem>>, AppError> {
    Ok(Json(RealtimeService::get_feed(&state.db, params).await?))
}

/// Lowest footprints over a trailing window
#[utoipa::path(
    get,
    path = "/api/realtime/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Leaderboard", body = LeaderboardResponse)
    ),
    tag = "Realtime"
)]
#[instrument(skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    Ok(Json(RealtimeService::get_leaderboard(&state.db, params).await?))
}
