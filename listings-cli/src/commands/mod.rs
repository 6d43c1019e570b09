//! Command implementations for the listings CLI

pub mod serve;
pub mod sql;

pub use serve::run_serve;
pub use sql::run_sql;
