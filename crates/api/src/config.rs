//! Process configuration, read once from the environment at startup.

use core::str::FromStr;

use thiserror::Error;

use crudkit_observability::LogFormat;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got `{0}`")]
    InvalidPort(String),

    #[error("STORE_BACKEND must be `memory` or `postgres`, got `{0}`")]
    UnknownBackend(String),

    #[error("DATABASE_URL must be set when STORE_BACKEND=postgres")]
    MissingDatabaseUrl,

    #[error("LOG_FORMAT: {0}")]
    InvalidLogFormat(String),
}

/// Where records are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Postgres { database_url: String },
}

impl StoreConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::Postgres { .. } => "postgres",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            store: StoreConfig::Memory,
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    /// Read `HOST`, `PORT`, `STORE_BACKEND`, `DATABASE_URL` and `LOG_FORMAT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let store = match lookup("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StoreConfig::Memory,
            Some("postgres") => StoreConfig::Postgres {
                database_url: lookup("DATABASE_URL")
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::MissingDatabaseUrl)?,
            },
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => LogFormat::from_str(&raw).map_err(ConfigError::InvalidLogFormat)?,
            None => LogFormat::Json,
        };

        Ok(Self {
            host,
            port,
            store,
            log_format,
        })
    }

    /// `host:port` string for the listener.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
