use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

use crate::swapi::DEFAULT_BASE_URL;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub swapi_base_url: String,
    pub database_max_connections: u32,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL")
            .or_else(|| get("DB_CONNECTION_STRING"))
            .ok_or(ConfigError::MissingEnvVar("DATABASE_URL"))?;
        let jwt_secret = get("JWT_SECRET_KEY")
            .or_else(|| get("FLASK_API_KEY"))
            .ok_or(ConfigError::MissingEnvVar("JWT_SECRET_KEY"))?;

        let host = match get("BIND_ADDR") {
            Some(value) => value.parse::<IpAddr>().map_err(|e| ConfigError::InvalidEnvValue {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match get("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError::InvalidEnvValue {
                var: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::InvalidEnvValue {
                        var: "DATABASE_MAX_CONNECTIONS",
                        reason: "must be at least 1".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::InvalidEnvValue {
                        var: "DATABASE_MAX_CONNECTIONS",
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: SocketAddr::new(host, port),
            swapi_base_url: get("SWAPI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            database_max_connections,
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = config_from(&[("DATABASE_URL", "app.db"), ("JWT_SECRET_KEY", "s3cret")]).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.swapi_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.database_max_connections, 10);
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn legacy_variable_names_are_accepted() {
        let config = config_from(&[
            ("DB_CONNECTION_STRING", "legacy.db"),
            ("FLASK_API_KEY", "legacy"),
            ("PORT", "8000"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "legacy.db");
        assert_eq!(config.jwt_secret, "legacy");
        assert_eq!(config.bind_addr.port(), 8000);
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = config_from(&[("DATABASE_URL", "app.db")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("JWT_SECRET_KEY")));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = config_from(&[
            ("DATABASE_URL", "app.db"),
            ("JWT_SECRET_KEY", "s3cret"),
            ("PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvValue { var: "PORT", .. }));
    }
}
