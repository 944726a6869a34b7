use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use ecotrack_core::AppError;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::calculator::EMISSION_FACTORS;
use super::model::{
    CreateFootprintRequest, EmissionFactorResponse, Footprint, FootprintFilterParams,
    FootprintSummary, PaginatedFootprintsResponse, SummaryParams, UpdateFootprintRequest,
};
use super::service::FootprintService;

/// List the built-in emission factors
#[utoipa::path(
    get,
    path = "/api/footprints/factors",
    responses(
        (status = 200, description = "Emission factor table", body = Vec<EmissionFactorResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Footprints",
    security(("bearer_auth" = []))
)]
pub async fn get_factors(_auth_user: AuthUser) -> Json<Vec<EmissionFactorResponse>> {
    Json(EMISSION_FACTORS.iter().map(EmissionFactorResponse::from).collect())
}

/// Record an activity
///
/// CO2e is calculated from the factor table unless `emission_factor` is given.
#[utoipa::path(
    post,
    path = "/api/footprints",
    request_body = CreateFootprintRequest,
    responses(
        (status = 201, description = "Footprint recorded", body = Footprint),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation error or unknown activity", body = ErrorResponse)
    ),
    tag = "Footprints",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_footprint(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateFootprintRequest>,
) -> Result<(StatusCode, Json<Footprint>), AppError> {
    let footprint =
        FootprintService::create_footprint(&state.db, auth_user.user_id()?, dto).await?;
    Ok((StatusCode::CREATED, Json(footprint)))
}

/// List the caller's footprints
#[utoipa::path(
    get,
    path = "/api/footprints",
    params(FootprintFilterParams),
    responses(
        (status = 200, description = "Paginated footprints, newest first", body = PaginatedFootprintsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Footprints",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_footprints(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<FootprintFilterParams>,
) -> Result<Json<PaginatedFootprintsResponse>, AppError> {
    let footprints =
        FootprintService::get_footprints(&state.db, auth_user.user_id()?, filters).await?;
    Ok(Json(footprints))
}

/// Totals per category over an optional date range
#[utoipa::path(
    get,
    path = "/api/footprints/summary",
    params(SummaryParams),
    responses(
        (status = 200, description = "Footprint summary", body = FootprintSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Footprints",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<SummaryParams>,
) -> Result<Json<FootprintSummary>, AppError> {
    let summary = FootprintService::get_summary(&state.db, auth_user.user_id()?, params).await?;
    Ok(Json(summary))
}

/// Get a footprint by ID
#[utoipa::path(
    get,
    path = "/api/footprints/{id}",
    params(("id" = i64, Path, description = "Footprint ID")),
    responses(
        (status = 200, description = "Footprint", body = Footprint),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Footprint not found", body = ErrorResponse)
    ),
    tag = "Footprints",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_footprint(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Footprint>, AppError> {
    let footprint = FootprintService::get_footprint(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(footprint))
}

/// Update a footprint and recalculate its CO2e
#[utoipa::path(
    put,
    path = "/api/footprints/{id}",
    params(("id" = i64, Path, description = "Footprint ID")),
    request_body = UpdateFootprintRequest,
    responses(
        (status = 200, description = "Footprint updated", body = Footprint),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Footprint not found", body = ErrorResponse),
        (status = 422, description = "Validation error or unknown activity", body = ErrorResponse)
    ),
    tag = "Footprints",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_footprint(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateFootprintRequest>,
) -> Result<Json<Footprint>, AppError> {
    let footprint =
        FootprintService::update_footprint(&state.db, auth_user.user_id()?, id, dto).await?;
    Ok(Json(footprint))
}

/// Delete a footprint
#[utoipa::path(
    delete,
    path = "/api/footprints/{id}",
    params(("id" = i64, Path, description = "Footprint ID")),
    responses(
        (status = 204, description = "Footprint deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Footprint not found", body = ErrorResponse)
    ),
    tag = "Footprints",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_footprint(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    FootprintService::delete_footprint(&state.db, auth_user.user_id()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
