//! Database layer - query construction and per-request connections
//!
//! # Design Principles
//!
//! - One connection per request, no pool
//! - Every acquired connection is released before the request finishes
//! - Filter values are bound as parameters, never spliced into SQL text

pub mod connection;
pub mod memory;
pub mod query;

pub use connection::{fetch_properties, Connector, DbError, MySqlConnector, PropertySession};
pub use memory::MemoryConnector;
pub use query::PropertyQuery;
