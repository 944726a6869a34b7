use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use ecotrack_auth::{AUTH_COOKIE_NAME, Claims, verify_token};
use ecotrack_config::JwtConfig;
use ecotrack_core::AppError;

use crate::state::AppState;

/// Extractor that validates the JWT and provides the authenticated user's
/// claims.
///
/// The `Authorization: Bearer` header wins over the `token` cookie when both
/// are present.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.0.user_id()
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(&parts.headers)? {
            Some(token) => token,
            None => cookie_token(&parts.headers)
                .ok_or_else(|| AppError::unauthorized("Authentication required"))?,
        };

        let claims = verify_token(&token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header format"))?;

    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim().to_string()))
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// HttpOnly session cookie carrying the access token.
pub fn auth_cookie(token: String, config: &JwtConfig) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .path("/")
        .build()
}

/// Removal cookie matching the path of [`auth_cookie`].
pub fn expired_auth_cookie() -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE_NAME).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
            cookie_secure: false,
        }
    }

    #[test]
    fn test_bearer_token_absent() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers).unwrap(), None);
    }

    #[test]
    fn test_bearer_token_present() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), Some("abc.def".to_string()));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        let err = bearer_token(&headers).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_cookie_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=jwt-value"),
        );
        assert_eq!(cookie_token(&headers), Some("jwt-value".to_string()));
    }

    #[test]
    fn test_empty_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(cookie_token(&headers), None);
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("jwt".to_string(), &config());
        assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
        assert_eq!(cookie.value(), "jwt");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(false));
    }
}
