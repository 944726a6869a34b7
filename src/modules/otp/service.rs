use anyhow::anyhow;
use chrono::{Duration, NaiveDateTime, Utc};
use ecotrack_auth::create_access_token;
use ecotrack_config::{EmailConfig, JwtConfig, OtpConfig};
use ecotrack_core::AppError;
use sqlx::MySqlPool;
use tracing::{info, instrument, warn};

use crate::metrics::{track_jwt_issued, track_otp_issued, track_otp_verification, track_user_login_success};
use crate::modules::users::model::User;
use crate::modules::users::service::{UserService, normalize_email};
use crate::utils::email::EmailService;

use super::code::{
    OtpCheck, cooldown_remaining, evaluate, generate_code, hash_code, is_expired,
};
use super::model::{OtpPurpose, OtpRecord, SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse};

pub struct OtpService;

fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl OtpService {
    /// Issues a code for an existing account. Unknown emails succeed silently
    /// so the endpoint cannot be used to probe for accounts.
    #[instrument(skip(db, email_config, otp_config), fields(purpose = dto.purpose.as_str()))]
    pub async fn send_code(
        db: &MySqlPool,
        email_config: &EmailConfig,
        otp_config: &OtpConfig,
        dto: SendOtpRequest,
    ) -> Result<(), AppError> {
        let email = normalize_email(&dto.email);
        let purpose = dto.purpose;

        let Some(user) = UserService::find_by_email(db, &email).await? else {
            info!("OTP requested for unknown email");
            return Ok(());
        };

        let now = now_utc();

        let last_sent = sqlx::query_scalar::<_, NaiveDateTime>(
            "SELECT created_at FROM otp_codes WHERE email = ? AND purpose = ?
             ORDER BY id DESC LIMIT 1",
        )
        .bind(&email)
        .bind(purpose.as_str())
        .fetch_optional(db)
        .await?;

        if let Some(wait) = last_sent
            .and_then(|sent| cooldown_remaining(sent, now, otp_config.resend_cooldown_secs))
        {
            return Err(AppError::too_many_requests(format!(
                "Please wait {} seconds before requesting another code",
                wait
            )));
        }

        sqlx::query(
            "UPDATE otp_codes SET consumed_at = ?
             WHERE email = ? AND purpose = ? AND consumed_at IS NULL",
        )
        .bind(now)
        .bind(&email)
        .bind(purpose.as_str())
        .execute(db)
        .await?;

        let code = generate_code(otp_config.length);
        let expires_at = now + Duration::seconds(otp_config.ttl_secs);

        sqlx::query(
            "INSERT INTO otp_codes (email, purpose, code_hash, attempts, expires_at, created_at)
             VALUES (?, ?, ?, 0, ?, ?)",
        )
        .bind(&email)
        .bind(purpose.as_str())
        .bind(hash_code(&email, purpose, &code))
        .bind(expires_at)
        .bind(now)
        .execute(db)
        .await?;

        EmailService::new(email_config.clone())
            .send_otp_email(&email, &user.name, &code, purpose, ttl_minutes(otp_config.ttl_secs))
            .await?;

        track_otp_issued(purpose.as_str());
        info!(user_id = user.id, "OTP issued");

        Ok(())
    }

    /// Checks a code against the latest unconsumed one. A correct code is
    /// consumed, then applied: `verify_email` marks the account verified and
    /// `login` issues an access token.
    #[instrument(skip(db, jwt_config, otp_config, dto), fields(purpose = dto.purpose.as_str()))]
    pub async fn verify_code(
        db: &MySqlPool,
        jwt_config: &JwtConfig,
        otp_config: &OtpConfig,
        dto: VerifyOtpRequest,
    ) -> Result<VerifyOtpResponse, AppError> {
        let email = normalize_email(&dto.email);
        let purpose = dto.purpose;

        let record = sqlx::query_as::<_, OtpRecord>(
            "SELECT id, code_hash, attempts, expires_at FROM otp_codes
             WHERE email = ? AND purpose = ? AND consumed_at IS NULL
             ORDER BY id DESC LIMIT 1",
        )
        .bind(&email)
        .bind(purpose.as_str())
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::bad_request(anyhow!("Invalid or expired code")))?;

        let now = now_utc();
        let check = if is_expired(record.expires_at, now) {
            OtpCheck::Expired
        } else {
            let claimed = Self::claim_attempt(db, record.id, otp_config.max_attempts).await?;
            evaluate(
                &record.code_hash,
                &hash_code(&email, purpose, &dto.code),
                claimed,
                otp_config.max_attempts,
            )
        };
        track_otp_verification(purpose.as_str(), check.as_str());

        match check {
            OtpCheck::AttemptsExhausted => {
                Self::consume(db, record.id, now).await?;
                warn!("OTP attempts exhausted");
                return Err(AppError::too_many_requests(
                    "Too many incorrect attempts, request a new code",
                ));
            }
            OtpCheck::Expired => {
                Self::consume(db, record.id, now).await?;
                return Err(AppError::bad_request(anyhow!(
                    "Code has expired, request a new one"
                )));
            }
            OtpCheck::Mismatch { remaining_attempts } => {
                warn!(remaining_attempts, "Incorrect OTP submitted");
                return Err(AppError::bad_request(anyhow!("Invalid or expired code")));
            }
            OtpCheck::Valid => {
                // Two concurrent correct submissions: only one wins the update
                if !Self::consume(db, record.id, now).await? {
                    return Err(AppError::bad_request(anyhow!("Invalid or expired code")));
                }
            }
        }

        let user = UserService::find_by_email(db, &email)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        match purpose {
            OtpPurpose::VerifyEmail => {
                UserService::mark_verified(db, user.id).await?;
                let user = UserService::get_by_id(db, user.id).await?;
                info!(user_id = user.id, "Email verified");
                Ok(VerifyOtpResponse {
                    message: "Email verified".to_string(),
                    token: None,
                    user,
                })
            }
            OtpPurpose::Login => {
                let token = create_access_token(user.id, &user.email, jwt_config)?;
                track_jwt_issued();
                track_user_login_success("otp");
                info!(user_id = user.id, "User logged in with OTP");
                Ok(login_response(token, user))
            }
        }
    }

    /// Counts one attempt against a live code and returns its 1-based number,
    /// or `None` if none were left. The check and the increment are a single
    /// statement, so concurrent requests can never claim more than
    /// `max_attempts` between them. `LAST_INSERT_ID(expr)` makes MySQL report
    /// the new counter back in the statement result.
    async fn claim_attempt(
        db: &MySqlPool,
        id: i64,
        max_attempts: i32,
    ) -> Result<Option<i32>, AppError> {
        let result = sqlx::query(
            "UPDATE otp_codes SET attempts = LAST_INSERT_ID(attempts + 1)
             WHERE id = ? AND consumed_at IS NULL AND attempts < ?",
        )
        .bind(id)
        .bind(max_attempts)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(i32::try_from(result.last_insert_id()).ok())
    }

    /// Marks a code consumed. Returns false if it already was.
    async fn consume(db: &MySqlPool, id: i64, now: NaiveDateTime) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE otp_codes SET consumed_at = ? WHERE id = ? AND consumed_at IS NULL")
                .bind(now)
                .bind(id)
                .execute(db)
                .await?;

        Ok(result.rows_affected() == 1)
    }
}

fn login_response(token: String, user: User) -> VerifyOtpResponse {
    VerifyOtpResponse {
        message: "Login successful".to_string(),
        token: Some(token),
        user,
    }
}

/// Whole minutes for display, rounded up.
fn ttl_minutes(ttl_secs: i64) -> i64 {
    (ttl_secs.max(0) + 59) / 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_minutes_rounds_up() {
        assert_eq!(ttl_minutes(600), 10);
        assert_eq!(ttl_minutes(61), 2);
        assert_eq!(ttl_minutes(0), 0);
    }
}
