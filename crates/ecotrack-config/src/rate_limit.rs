//! Rate limiting configuration for API endpoints.
//!
//! Limits are token buckets from the `governor` crate, keyed per client:
//!
//! - Tokens are added at the configured rate (per second)
//! - Each request consumes one token
//! - Burst size defines the maximum tokens that can accumulate
//! - Requests are rejected when no tokens are available
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: Replenish rate for all `/api` routes (default: 20)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: Burst for all `/api` routes (default: 60)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: Replenish rate for auth and OTP routes (default: 2)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: Burst for auth and OTP routes (default: 10)
//! - `RATE_LIMIT_TRUSTED_PROXIES`: Comma-separated proxy IPs whose
//!   `X-Forwarded-For` header is believed (default: none, so clients are
//!   keyed by peer address only)

use std::env;
use std::net::IpAddr;
use std::num::NonZeroU32;

use governor::Quota;

use crate::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub general_per_second: u32,
    pub general_burst_size: u32,
    /// Stricter limits for login, registration and OTP endpoints.
    pub auth_per_second: u32,
    pub auth_burst_size: u32,
    /// Peers allowed to report the client address via `X-Forwarded-For`.
    pub trusted_proxies: Vec<IpAddr>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_second: 20,
            general_burst_size: 60,
            auth_per_second: 2,
            auth_burst_size: 10,
            trusted_proxies: Vec::new(),
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            general_per_second: parse_or(
                &lookup,
                "RATE_LIMIT_GENERAL_PER_SECOND",
                defaults.general_per_second,
            ),
            general_burst_size: parse_or(
                &lookup,
                "RATE_LIMIT_GENERAL_BURST_SIZE",
                defaults.general_burst_size,
            ),
            auth_per_second: parse_or(
                &lookup,
                "RATE_LIMIT_AUTH_PER_SECOND",
                defaults.auth_per_second,
            ),
            auth_burst_size: parse_or(
                &lookup,
                "RATE_LIMIT_AUTH_BURST_SIZE",
                defaults.auth_burst_size,
            ),
            trusted_proxies: lookup("RATE_LIMIT_TRUSTED_PROXIES")
                .map(|value| parse_ip_list(&value))
                .unwrap_or(defaults.trusted_proxies),
        }
    }

    #[must_use]
    pub fn general_quota(&self) -> Quota {
        quota(self.general_per_second, self.general_burst_size)
    }

    #[must_use]
    pub fn auth_quota(&self) -> Quota {
        quota(self.auth_per_second, self.auth_burst_size)
    }
}

/// Entries that are not IP addresses are ignored.
fn parse_ip_list(value: &str) -> Vec<IpAddr> {
    value
        .split(',')
        .filter_map(|ip| ip.trim().parse().ok())
        .collect()
}

/// Zero values are raised to one so a misconfigured limit never panics.
fn quota(per_second: u32, burst_size: u32) -> Quota {
    let per_second = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
    let burst_size = NonZeroU32::new(burst_size).unwrap_or(NonZeroU32::MIN);
    Quota::per_second(per_second).allow_burst(burst_size)
}
