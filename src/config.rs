//! Service Configuration
//!
//! Listen address, store connection string and storage timeout. Values come
//! from the process environment; CLI flags may override them afterwards.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::storage::StoreLocation;

/// Configuration errors, all fatal at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Unsupported database URL '{0}' (expected memory:// or file://<path>)")]
    UnsupportedDatabaseUrl(String),

    #[error("Storage timeout must be greater than zero")]
    ZeroTimeout,
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Store connection string (default: "memory://")
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Bound on each storage call in milliseconds (default: 5000)
    #[serde(default = "default_storage_timeout_ms")]
    pub storage_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "memory://".to_string()
}

fn default_storage_timeout_ms() -> u64 {
    5000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            storage_timeout_ms: default_storage_timeout_ms(),
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

impl AppConfig {
    /// Load from `HOST`, `PORT`, `DATABASE_URL` and `STORAGE_TIMEOUT_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup; unset keys keep their default
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse("PORT", port)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(ms) = lookup("STORAGE_TIMEOUT_MS") {
            config.storage_timeout_ms = parse("STORAGE_TIMEOUT_MS", ms)?;
        }

        info!(
            host = %config.host,
            port = config.port,
            database_url = %config.database_url,
            storage_timeout_ms = config.storage_timeout_ms,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check cross-field constraints and resolve the store location
    pub fn validate(&self) -> Result<StoreLocation, ConfigError> {
        if self.storage_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.store_location()
    }

    pub fn store_location(&self) -> Result<StoreLocation, ConfigError> {
        StoreLocation::parse(&self.database_url)
            .ok_or_else(|| ConfigError::UnsupportedDatabaseUrl(self.database_url.clone()))
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
        assert_eq!(config.validate(), Ok(StoreLocation::Memory));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "file:///tmp/lessons.db"),
            ("STORAGE_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_timeout(), Duration::from_millis(250));
        assert_eq!(
            config.validate(),
            Ok(StoreLocation::File(PathBuf::from("/tmp/lessons.db")))
        );
    }

    #[test]
    fn test_bad_port() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_unknown_scheme() {
        let config = AppConfig {
            storage_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        let config = AppConfig {
            database_url: "mongodb://localhost:27017".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedDatabaseUrl(_))
        ));
    }
}
