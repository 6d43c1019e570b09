//! Database configuration - environment loading
//!
//! Configuration is loaded once at startup from environment variables:
//! - `HOST`: database host (required)
//! - `PORT`: database port (default: 3306)
//! - `USER`: database user (required)
//! - `PASSWORD`: database password (default: empty)
//! - `DATABASE`: schema name (required)

use std::fmt;
use std::num::ParseIntError;

/// Default MySQL port when `PORT` is unset
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Configuration error; fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {key}")]
    Missing { key: &'static str },

    #[error("invalid {key} value '{value}': {source}")]
    InvalidNumber {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Connection parameters for the property store
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing { key })
        };

        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidNumber {
                    key: "PORT",
                    value: raw.clone(),
                    source,
                })?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Self {
            host: required("HOST")?,
            port,
            user: required("USER")?,
            password: lookup("PASSWORD").unwrap_or_default(),
            database: required("DATABASE")?,
        })
    }

    /// `user@host:port/database`, safe to log
    pub fn target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}
