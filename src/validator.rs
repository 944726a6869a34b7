//! `ValidatedJson<T>`: a JSON body extractor that also runs `validator` rules.
//!
//! Body problems (wrong content type, malformed JSON, missing or mistyped
//! fields) are 400s; rule violations are 422s.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use ecotrack_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        )),
        JsonRejection::JsonDataError(err) => {
            let text = err.body_text();
            match missing_field(&text) {
                Some(field) => AppError::bad_request(anyhow!("{} is required", field)),
                None => AppError::bad_request(anyhow!("Invalid field in request body")),
            }
        }
        JsonRejection::JsonSyntaxError(_) => AppError::bad_request(anyhow!("Malformed JSON body")),
        _ => AppError::bad_request(anyhow!("Invalid request body")),
    }
}

/// Pulls `name` out of serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    message
        .split("missing field `")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
}

pub(crate) fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8, message = "password must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn test_missing_field_extraction() {
        assert_eq!(
            missing_field("Failed to deserialize: missing field `email` at line 1"),
            Some("email")
        );
        assert_eq!(missing_field("invalid type: integer"), None);
    }

    #[test]
    fn test_format_errors_uses_custom_and_default_messages() {
        let sample = Sample {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(
            format_errors(&errors),
            "email is invalid, password must be at least 8 characters"
        );
    }
}
