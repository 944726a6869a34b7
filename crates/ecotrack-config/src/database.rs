//! MySQL connection settings.
//!
//! # Environment Variables
//!
//! - `DB_HOST`: Server host (default: `localhost`)
//! - `DB_PORT`: Server port (default: `3306`)
//! - `DB_USER`: User name (default: `root`)
//! - `DB_PASSWORD`: Password (default: `root`)
//! - `DB_NAME`: Database name (default: `ecotrack`)
//! - `DB_MAX_CONNECTIONS`: Pool connection limit (default: `10`)
//! - `DB_ACQUIRE_TIMEOUT_SECS`: How long a caller waits for a pooled
//!   connection before giving up (default: `30`)

use std::env;
use std::fmt;
use std::time::Duration;

use crate::{parse_or, string_or};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: "root".to_string(),
            database: "ecotrack".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: string_or(&lookup, "DB_HOST", &defaults.host),
            port: parse_or(&lookup, "DB_PORT", defaults.port),
            user: string_or(&lookup, "DB_USER", &defaults.user),
            password: string_or(&lookup, "DB_PASSWORD", &defaults.password),
            database: string_or(&lookup, "DB_NAME", &defaults.database),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)
                .max(1),
            acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_defaults_when_unset() {
        let config = DatabaseConfig::from_lookup(|_| None);
        assert_eq!(config, DatabaseConfig::default());
        assert_eq!(config.host, "localhost");
        assert_eq!(config.user, "root");
        assert_eq!(config.database, "ecotrack");
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_reads_values() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "3307"),
            ("DB_USER", "eco"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "eco_test"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "2"),
        ]));
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 3307);
        assert_eq!(config.user, "eco");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.database, "eco_test");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.acquire_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_connections_is_raised_to_one() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "0")]));
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[("DB_PASSWORD", "hunter2")]));
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("hunter2"));
        assert!(debug_str.contains("***"));
    }
}
