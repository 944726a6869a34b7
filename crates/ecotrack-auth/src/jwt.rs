//! JWT creation and verification (HS256).

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use ecotrack_config::JwtConfig;
use ecotrack_core::AppError;

use crate::claims::Claims;

/// Name of the HttpOnly cookie carrying the access token.
pub const AUTH_COOKIE_NAME: &str = "token";

pub fn create_access_token(
    user_id: i64,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Checks signature and expiry; any failure is a 401.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            access_token_expiry: 3600,
            cookie_secure: false,
        }
    }

    #[test]
    fn test_round_trip() {
        let config = get_test_jwt_config();
        let token = create_access_token(42, "eco@example.com", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "eco@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = get_test_jwt_config();
        let token = create_access_token(1, "eco@example.com", &config).unwrap();

        let other = JwtConfig {
            secret: "a-different-secret".to_string(),
            ..get_test_jwt_config()
        };
        let err = verify_token(&token, &other).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Default validation allows 60s of leeway, so go well past it.
        let config = JwtConfig {
            access_token_expiry: 0,
            ..get_test_jwt_config()
        };
        let past = (Utc::now().timestamp() - 3600) as usize;
        let claims = Claims {
            sub: "1".to_string(),
            email: "eco@example.com".to_string(),
            exp: past,
            iat: past - 10,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verify_token("invalid.token.here", &get_test_jwt_config()).is_err());
    }
}
