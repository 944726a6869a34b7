use std::env;
use std::fmt;

use crate::{flag_or, parse_or, string_or};

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Marks the auth cookie `Secure` (HTTPS only).
    pub cookie_secure: bool,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            secret: string_or(&lookup, "JWT_SECRET", "your-secret-key-change-in-production"),
            access_token_expiry: parse_or(&lookup, "JWT_ACCESS_EXPIRY", 86400), // 1 day
            cookie_secure: flag_or(&lookup, "COOKIE_SECURE", false),
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_defaults() {
        let config = JwtConfig::from_lookup(|_| None);
        assert_eq!(config.access_token_expiry, 86400);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = JwtConfig::from_lookup(lookup_from(&[("JWT_SECRET", "topsecret")]));
        assert_eq!(config.secret, "topsecret");
        assert!(!format!("{:?}", config).contains("topsecret"));
    }
}
