use anyhow::anyhow;
use ecotrack_auth::create_access_token;
use ecotrack_config::JwtConfig;
use ecotrack_core::{AppError, hash_password, verify_password};
use sqlx::MySqlPool;
use tracing::{info, instrument, warn};

use crate::metrics::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};
use crate::modules::users::model::User;
use crate::modules::users::service::{UserService, normalize_email};

use super::model::{LoginRequest, LoginResponse, RegisterRequest};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register_user(db: &MySqlPool, dto: RegisterRequest) -> Result<User, AppError> {
        let email = normalize_email(&dto.email);

        if UserService::find_by_email(db, &email).await?.is_some() {
            return Err(AppError::conflict(anyhow!("Email already registered")));
        }

        let password_hash = hash_password(&dto.password)?;
        let user = UserService::create(db, dto.name.trim(), &email, &password_hash).await?;

        track_user_registered();
        info!(user_id = user.id, "User registered");

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &MySqlPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&dto.email);

        let Some(credentials) = UserService::credentials_by_email(db, &email).await? else {
            track_user_login_failure("unknown_email");
            warn!("Login attempt for unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &credentials.password_hash)? {
            track_user_login_failure("invalid_password");
            warn!(user_id = credentials.id, "Login attempt with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = create_access_token(credentials.id, &credentials.email, jwt_config)?;
        track_jwt_issued();
        track_user_login_success("password");

        let user = UserService::get_by_id(db, credentials.id).await?;
        info!(user_id = user.id, "User logged in");

        Ok(LoginResponse { token, user })
    }
}
