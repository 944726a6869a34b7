use ecotrack_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_sub(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "test@example.com".to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id_parses_numeric_subject() {
        assert_eq!(claims_with_sub("42").user_id().unwrap(), 42);
    }

    #[test]
    fn test_user_id_rejects_garbage() {
        let err = claims_with_sub("not-a-number").user_id().unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_claims_serialize() {
        let json = serde_json::to_value(claims_with_sub("7")).unwrap();
        assert_eq!(json["sub"], "7");
        assert_eq!(json["email"], "test@example.com");
    }
}
