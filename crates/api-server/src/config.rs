//! Server configuration from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = ".membership-data";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            cors_permissive: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = match lookup("MEMBERSHIP_HOST") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid MEMBERSHIP_HOST {:?}", raw);
                defaults.host
            }),
            None => defaults.host,
        };

        let port = match lookup("MEMBERSHIP_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid MEMBERSHIP_PORT {:?}", raw);
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            data_dir: lookup("MEMBERSHIP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            host,
            port,
            cors_permissive: flag(
                lookup("MEMBERSHIP_CORS_PERMISSIVE"),
                defaults.cors_permissive,
            ),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.data_dir, PathBuf::from(".membership-data"));
        assert_eq!(config.listen_addr(), "0.0.0.0:8000".parse().unwrap());
        assert!(config.cors_permissive);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("MEMBERSHIP_DATA_DIR", "/var/lib/membership"),
            ("MEMBERSHIP_HOST", "127.0.0.1"),
            ("MEMBERSHIP_PORT", "9100"),
            ("MEMBERSHIP_CORS_PERMISSIVE", "off"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/membership"));
        assert_eq!(config.listen_addr(), "127.0.0.1:9100".parse().unwrap());
        assert!(!config.cors_permissive);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("MEMBERSHIP_PORT", "eighty"),
            ("MEMBERSHIP_CORS_PERMISSIVE", "maybe"),
        ]);
        assert_eq!(config.port, 8000);
        assert!(config.cors_permissive);
    }
}
