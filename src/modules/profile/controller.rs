use axum::Json;
use axum::extract::State;
use ecotrack_core::AppError;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::{ErrorResponse, MessageResponse};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest};
use super::service::ProfileService;

/// Get the caller's profile and footprint stats
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = ProfileService::get_profile(&state.db, auth_user.user_id()?).await?;
    Ok(Json(profile))
}

/// Update profile details
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = ProfileService::update_profile(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(profile))
}

/// Change password
#[utoipa::path(
    put,
    path = "/api/profile/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 401, description = "Unauthorized or wrong current password", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    ProfileService::change_password(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}
