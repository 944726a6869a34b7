use std::env;

use crate::parse_or;

/// One-time code settings.
///
/// - `OTP_LENGTH`: Number of digits (default: 6, clamped to 4..=10)
/// - `OTP_TTL_SECS`: Lifetime of a code (default: 600)
/// - `OTP_MAX_ATTEMPTS`: Wrong guesses before a code is burned (default: 5)
/// - `OTP_RESEND_COOLDOWN_SECS`: Minimum gap between two sends (default: 60)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpConfig {
    pub length: usize,
    pub ttl_secs: i64,
    pub max_attempts: i32,
    pub resend_cooldown_secs: i64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            length: 6,
            ttl_secs: 600,
            max_attempts: 5,
            resend_cooldown_secs: 60,
        }
    }
}

impl OtpConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            length: parse_or(&lookup, "OTP_LENGTH", defaults.length).clamp(4, 10),
            ttl_secs: parse_or(&lookup, "OTP_TTL_SECS", defaults.ttl_secs).max(1),
            max_attempts: parse_or(&lookup, "OTP_MAX_ATTEMPTS", defaults.max_attempts).max(1),
            resend_cooldown_secs: parse_or(
                &lookup,
                "OTP_RESEND_COOLDOWN_SECS",
                defaults.resend_cooldown_secs,
            )
            .max(0),
        }
    }
}
