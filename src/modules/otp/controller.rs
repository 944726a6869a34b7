use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use ecotrack_core::AppError;
use tracing::instrument;

use crate::middleware::auth::auth_cookie;
use crate::modules::auth::model::{ErrorResponse, MessageResponse};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse};
use super::service::OtpService;

/// Send a one-time code by email
#[utoipa::path(
    post,
    path = "/api/otp/send",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code sent if the account exists", body = MessageResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Resend cooldown or rate limit", body = ErrorResponse)
    ),
    tag = "OTP"
)]
#[instrument(skip(state, dto))]
pub async fn send_otp(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SendOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    OtpService::send_code(&state.db, &state.email_config, &state.otp_config, dto).await?;
    Ok(Json(MessageResponse {
        message: "If an account exists for that email, a code has been sent.".to_string(),
    }))
}

/// Verify a one-time code
///
/// `login` codes also set the `token` cookie.
#[utoipa::path(
    post,
    path = "/api/otp/verify",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code accepted", body = VerifyOtpResponse),
        (status = 400, description = "Invalid or expired code", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many incorrect attempts", body = ErrorResponse)
    ),
    tag = "OTP"
)]
#[instrument(skip(state, jar, dto))]
pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<VerifyOtpRequest>,
) -> Result<(CookieJar, Json<VerifyOtpResponse>), AppError> {
    let response =
        OtpService::verify_code(&state.db, &state.jwt_config, &state.otp_config, dto).await?;

    let jar = match &response.token {
        Some(token) => jar.add(auth_cookie(token.clone(), &state.jwt_config)),
        None => jar,
    };

    Ok((jar, Json(response)))
}
