use std::env;
use std::fmt;

use crate::{flag_or, parse_or, string_or};

#[derive(Clone)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
}

impl EmailConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            enabled: flag_or(&lookup, "SMTP_ENABLED", false),
            smtp_host: string_or(&lookup, "SMTP_HOST", "localhost"),
            smtp_port: parse_or(&lookup, "SMTP_PORT", 1025),
            smtp_username: string_or(&lookup, "SMTP_USERNAME", ""),
            smtp_password: string_or(&lookup, "SMTP_PASSWORD", ""),
            from_email: string_or(&lookup, "FROM_EMAIL", "noreply@ecotrack.app"),
            from_name: string_or(&lookup, "FROM_NAME", "EcoTrack"),
        }
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("enabled", &self.enabled)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .finish_non_exhaustive()
    }
}
