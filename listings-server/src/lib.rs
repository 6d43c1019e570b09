//! listings-server: HTTP service for property listings
//!
//! Serves `GET /properties`, querying MySQL for properties in their current
//! sale status, optionally filtered by year, city and status.

pub mod config;
pub mod db;
pub mod filters;
pub mod http;
pub mod models;

pub use config::{ConfigError, DatabaseConfig};
pub use db::{Connector, DbError, MemoryConnector, MySqlConnector, PropertyQuery};
pub use filters::{FilterSource, FilterSourceError, JsonFileSource, QueryStringSource};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use models::{FilterSet, FilterValue, PropertyRecord};
