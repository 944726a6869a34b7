use std::env;

/// Origins that may call the API from a browser with credentials.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:5505",
    "http://127.0.0.1:5505",
    "http://localhost:5000",
    "http://127.0.0.1:5000",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `ALLOWED_ORIGINS` is a comma-separated list that replaces the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins: Vec<String> = lookup("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().trim_end_matches('/').to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if allowed_origins.is_empty() {
            Self::default()
        } else {
            Self { allowed_origins }
        }
    }

    /// A missing origin (same-origin or non-browser caller) is always allowed.
    pub fn is_origin_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.allowed_origins.iter().any(|allowed| allowed == origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_default_allow_list() {
        let config = CorsConfig::from_lookup(|_| None);
        assert_eq!(config.allowed_origins.len(), 4);
        assert!(config.is_origin_allowed(Some("http://localhost:5505")));
        assert!(config.is_origin_allowed(Some("http://127.0.0.1:5000")));
    }

    #[test]
    fn test_missing_origin_allowed() {
        assert!(CorsConfig::default().is_origin_allowed(None));
    }

    #[test]
    fn test_foreign_origin_rejected() {
        let config = CorsConfig::default();
        assert!(!config.is_origin_allowed(Some("http://evil.example.com")));
        assert!(!config.is_origin_allowed(Some("http://localhost:5506")));
        assert!(!config.is_origin_allowed(Some("https://localhost:5505")));
    }

    #[test]
    fn test_env_override_replaces_defaults() {
        let config = CorsConfig::from_lookup(lookup_from(&[(
            "ALLOWED_ORIGINS",
            " https://eco.example.com/ , ,http://localhost:3000",
        )]));
        assert_eq!(
            config.allowed_origins,
            vec!["https://eco.example.com", "http://localhost:3000"]
        );
        assert!(!config.is_origin_allowed(Some("http://localhost:5505")));
    }

    #[test]
    fn test_blank_override_keeps_defaults() {
        let config = CorsConfig::from_lookup(lookup_from(&[("ALLOWED_ORIGINS", " , ")]));
        assert_eq!(config, CorsConfig::default());
    }
}
