use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::{parse_or, string_or};

/// Listening address and startup resources.
///
/// - `HOST`: Interface to bind (default: `0.0.0.0`, all interfaces)
/// - `PORT`: Port to bind (default: `5000`)
/// - `SCHEMA_PATH`: Schema script applied at startup (default: `db/schema.sql`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub schema_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            schema_path: PathBuf::from("db/schema.sql"),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: parse_or(&lookup, "HOST", defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            schema_path: PathBuf::from(string_or(&lookup, "SCHEMA_PATH", "db/schema.sql")),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_default_binds_all_interfaces_on_5000() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
        assert_eq!(config.schema_path, PathBuf::from("db/schema.sql"));
    }

    #[test]
    fn test_port_override() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
        ]));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }
}
