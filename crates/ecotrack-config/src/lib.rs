//! # EcoTrack Config
//!
//! Configuration types for the EcoTrack API, loaded from environment
//! variables (usually via a `.env` file read by `dotenvy` at startup).
//!
//! - [`database`]: MySQL connection settings and pool limits
//! - [`server`]: Listening address and schema script location
//! - [`cors`]: Origin allow-list
//! - [`jwt`]: Token signing and auth cookie settings
//! - [`email`]: SMTP delivery for OTP codes
//! - [`otp`]: One-time code length, lifetime, and attempt limits
//! - [`rate_limit`]: Request rate limits
//!
//! Every config has a `from_env()` constructor and a `from_lookup()`
//! constructor taking an arbitrary key lookup, which tests use instead of
//! mutating the process environment.
//!
//! # Example
//!
//! ```ignore
//! use ecotrack_config::{CorsConfig, DatabaseConfig, ServerConfig};
//!
//! let db_config = DatabaseConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod otp;
pub mod rate_limit;
pub mod server;

use std::str::FromStr;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use otp::OtpConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Reads `key` through `lookup`, falling back to `default` when the value is
/// missing or does not parse.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

pub(crate) fn flag_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v == "true" || v == "1"
        })
        .unwrap_or(default)
}

#[cfg(test)]
pub(crate) fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| {
        owned
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_falls_back_on_garbage() {
        let lookup = lookup_from(&[("PORT", "not-a-number")]);
        assert_eq!(parse_or(&lookup, "PORT", 5000u16), 5000);
    }

    #[test]
    fn test_flag_or() {
        let lookup = lookup_from(&[("A", "TRUE"), ("B", "1"), ("C", "no")]);
        assert!(flag_or(&lookup, "A", false));
        assert!(flag_or(&lookup, "B", false));
        assert!(!flag_or(&lookup, "C", true));
        assert!(flag_or(&lookup, "MISSING", true));
    }
}
