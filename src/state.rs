use std::sync::Arc;

use ecotrack_config::{CorsConfig, EmailConfig, JwtConfig, OtpConfig, RateLimitConfig};
use ecotrack_db::{DbError, MySqlPool, PoolManager};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: MySqlPool,
    pub pool_manager: Arc<PoolManager>,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub otp_config: OtpConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

impl AppState {
    /// Builds the state around the managed pool, initializing it if needed.
    pub async fn from_env(pool_manager: Arc<PoolManager>) -> Result<Self, DbError> {
        let db = pool_manager.get().await?.clone();

        Ok(Self {
            db,
            pool_manager,
            jwt_config: JwtConfig::from_env(),
            email_config: EmailConfig::from_env(),
            otp_config: OtpConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            rate_limit_config: RateLimitConfig::from_env(),
        })
    }
}
