//! Centralized configuration (environment variables + defaults).
//!
//! Values are read once at startup into [`AppConfig`] and handed down explicitly.

use crate::domain::request::{ValidationConfig, DEFAULT_PLATFORM_HOST_SUFFIX};
use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Where counters live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub validation: ValidationConfig,
}

impl AppConfig {
    /// Loads configuration from the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_var(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR)?;

        let store = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(database_url) => {
                let default = DEFAULT_DB_MAX_CONNECTIONS.to_string();
                let max_connections: u32 = parse_var(&lookup, "DB_MAX_CONNECTIONS", &default)?;
                StoreConfig::Postgres {
                    database_url,
                    max_connections: max_connections.max(1),
                }
            }
            None if parse_flag(&lookup, "IN_MEMORY_STORE")? => StoreConfig::InMemory,
            None => return Err(ConfigError::Missing("DATABASE_URL")),
        };

        let platform_host_suffix = match lookup("PLATFORM_HOST_SUFFIX") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v.trim().to_string()),
            None => Some(DEFAULT_PLATFORM_HOST_SUFFIX.to_string()),
        };

        let validation = ValidationConfig {
            same_domain_protection: parse_flag(&lookup, "SAME_DOMAIN_PROTECTION")?,
            platform_host_suffix,
            base64_urls: parse_flag(&lookup, "BASE64_URLS")?,
        };

        Ok(Self {
            bind_addr,
            store,
            validation,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(name).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}

/// Unset means false.
fn parse_flag<F>(lookup: &F, name: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_with_database() {
        let cfg = load(&[("DATABASE_URL", "postgres://localhost/likes")]).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(
            cfg.store,
            StoreConfig::Postgres {
                database_url: "postgres://localhost/likes".into(),
                max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            }
        );
        assert_eq!(cfg.validation, ValidationConfig::default());
    }

    #[test]
    fn database_is_required_unless_in_memory() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        let cfg = load(&[("IN_MEMORY_STORE", "true")]).unwrap();
        assert_eq!(cfg.store, StoreConfig::InMemory);
    }

    #[test]
    fn validation_flags() {
        let cfg = load(&[
            ("IN_MEMORY_STORE", "1"),
            ("SAME_DOMAIN_PROTECTION", "TRUE"),
            ("BASE64_URLS", "true"),
            ("PLATFORM_HOST_SUFFIX", ""),
        ])
        .unwrap();
        assert!(cfg.validation.same_domain_protection);
        assert!(cfg.validation.base64_urls);
        assert_eq!(cfg.validation.platform_host_suffix, None);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            load(&[("IN_MEMORY_STORE", "true"), ("SAME_DOMAIN_PROTECTION", "maybe")]),
            Err(ConfigError::Invalid {
                name: "SAME_DOMAIN_PROTECTION",
                value: "maybe".into()
            })
        );
        assert!(matches!(
            load(&[("IN_MEMORY_STORE", "true"), ("BIND_ADDR", "nowhere")]),
            Err(ConfigError::Invalid { name: "BIND_ADDR", .. })
        ));
    }
}
