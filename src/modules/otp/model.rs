use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    VerifyEmail,
    Login,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::VerifyEmail => "verify_email",
            OtpPurpose::Login => "login",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendOtpRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    pub purpose: OtpPurpose,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    pub purpose: OtpPurpose,
    #[validate(length(min = 4, max = 10, message = "code must be 4 to 10 digits"))]
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyOtpResponse {
    pub message: String,
    /// Present for `login` codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: User,
}

#[derive(Debug, FromRow)]
pub struct OtpRecord {
    pub id: i64,
    pub code_hash: String,
    pub attempts: i32,
    pub expires_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_wire_names() {
        assert_eq!(
            serde_json::to_string(&OtpPurpose::VerifyEmail).unwrap(),
            "\"verify_email\""
        );
        let purpose: OtpPurpose = serde_json::from_str("\"login\"").unwrap();
        assert_eq!(purpose, OtpPurpose::Login);
        assert_eq!(purpose.as_str(), "login");
    }

    #[test]
    fn test_verify_request_validation() {
        let request = VerifyOtpRequest {
            email: "ada@example.com".to_string(),
            purpose: OtpPurpose::Login,
            code: "12".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
