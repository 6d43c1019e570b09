//! Filter sources - where a request's filter set comes from
//!
//! Exactly one source is active per deployment:
//! - [`QueryStringSource`]: `?year=..&city=..&state=..` on the request URI
//! - [`JsonFileSource`]: a JSON document on disk, re-read on every request

pub mod file;
pub mod query_string;

use async_trait::async_trait;
use axum::http::Uri;

use crate::models::FilterSet;

pub use file::JsonFileSource;
pub use query_string::QueryStringSource;

/// Filter source error
#[derive(Debug, thiserror::Error)]
pub enum FilterSourceError {
    #[error("filter document not found: {path}")]
    NotFound { path: String },

    #[error("failed to read filter document {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed filter document {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed query string: {0}")]
    QueryString(String),
}

/// Produces the filter set for one request.
#[async_trait]
pub trait FilterSource: Send + Sync {
    async fn filters(&self, uri: &Uri) -> Result<FilterSet, FilterSourceError>;

    /// Short description for startup logging
    fn describe(&self) -> String;
}
