//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor, almacenamiento
//! y webhook de notificaciones.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://vehicle_service_logs.db";
pub const DEFAULT_TABLE_NAME: &str = "vehicle_service_logs";
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 5;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub table_name: String,
    pub webhook_url: Option<String>,
    pub webhook_timeout: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["*".to_string()],
            database_url: DEFAULT_DATABASE_URL.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            webhook_url: None,
            webhook_timeout: Duration::from_secs(DEFAULT_WEBHOOK_TIMEOUT_SECS),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno, con valores por defecto
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a valid number, got '{}'", raw))?,
            None => defaults.port,
        };

        let webhook_timeout = match var("WEBHOOK_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().with_context(|| {
                format!("WEBHOOK_TIMEOUT_SECS must be a valid number, got '{}'", raw)
            })?),
            None => defaults.webhook_timeout,
        };

        let cors_origins = match var("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: var("HOST").unwrap_or(defaults.host),
            cors_origins,
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            table_name: var("TABLE_NAME").unwrap_or(defaults.table_name),
            webhook_url: var("MAKE_WEBHOOK_URL"),
            webhook_timeout,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EnvironmentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.table_name, "vehicle_service_logs");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.webhook_url, None);
        assert_eq!(config.webhook_timeout, Duration::from_secs(5));
        assert!(config.is_development());
    }

    #[test]
    fn test_values_from_environment() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("HOST", "127.0.0.1"),
            ("TABLE_NAME", "fleet_logs"),
            ("MAKE_WEBHOOK_URL", "https://hook.example.com/abc"),
            ("WEBHOOK_TIMEOUT_SECS", "2"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();

        assert_eq!(config.server_url(), "127.0.0.1:9090");
        assert_eq!(config.table_name, "fleet_logs");
        assert_eq!(config.webhook_url.as_deref(), Some("https://hook.example.com/abc"));
        assert_eq!(config.webhook_timeout, Duration::from_secs(2));
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert!(!config.is_development());
    }

    #[test]
    fn test_blank_webhook_url_is_none() {
        let config = EnvironmentConfig::from_lookup(lookup(&[("MAKE_WEBHOOK_URL", "  ")])).unwrap();
        assert_eq!(config.webhook_url, None);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(EnvironmentConfig::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
    }
}
