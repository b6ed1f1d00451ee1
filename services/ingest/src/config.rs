//! Environment configuration

use std::path::PathBuf;

use crate::error::{ConfigError, RegistryError};
use crate::registry::UnitRegistry;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_API_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_url: Option<String>,
    pub max_connections: u32,
    pub default_province: String,
    pub unit_schema_path: Option<PathBuf>,
    pub api_bind: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    name: "DB_MAX_CONNECTIONS",
                    value: raw,
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            db_url: get("DB_URL"),
            max_connections,
            default_province: get("DEFAULT_PROVINCE").unwrap_or_default(),
            unit_schema_path: get("UNIT_SCHEMA_PATH").map(PathBuf::from),
            api_bind: get("API_BIND").unwrap_or_else(|| DEFAULT_API_BIND.to_string()),
        })
    }

    pub fn db_url(&self) -> Result<&str, ConfigError> {
        self.db_url.as_deref().ok_or(ConfigError::Missing("DB_URL"))
    }

    /// Built-in registry, merged with the schema file when one is configured
    pub async fn load_registry(&self) -> Result<UnitRegistry, RegistryError> {
        match &self.unit_schema_path {
            Some(path) => UnitRegistry::load(path).await,
            None => Ok(UnitRegistry::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.api_bind, "127.0.0.1:8080");
        assert_eq!(config.default_province, "");
        assert!(config.unit_schema_path.is_none());
        assert!(matches!(config.db_url(), Err(ConfigError::Missing("DB_URL"))));
    }

    #[test]
    fn test_values_are_read() {
        let config = config(&[
            ("DB_URL", "postgres://localhost/ingest"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("DEFAULT_PROVINCE", " Palawan "),
            ("UNIT_SCHEMA_PATH", "units.json"),
            ("API_BIND", "0.0.0.0:9000"),
        ])
        .unwrap();
        assert_eq!(config.db_url().unwrap(), "postgres://localhost/ingest");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.default_province, "Palawan");
        assert_eq!(config.unit_schema_path, Some(PathBuf::from("units.json")));
        assert_eq!(config.api_bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_blank_db_url_is_missing() {
        let config = config(&[("DB_URL", "  ")]).unwrap();
        assert!(config.db_url().is_err());
    }

    #[test]
    fn test_invalid_pool_size() {
        for bad in ["zero", "0", "-3"] {
            let result = config(&[("DB_MAX_CONNECTIONS", bad)]);
            assert!(matches!(result, Err(ConfigError::Invalid { name: "DB_MAX_CONNECTIONS", .. })));
        }
    }

    #[tokio::test]
    async fn test_registry_without_schema_file() {
        let registry = config(&[]).unwrap().load_registry().await.unwrap();
        assert!(registry.fields("animal-welfare").is_some());
    }
}
