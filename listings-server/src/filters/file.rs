//! Filters read from a JSON document on disk
//!
//! The document is read on every request, so edits take effect without a
//! restart. Expected shape: `{"year": 2020, "city": "bogota", "state": "en_venta"}`,
//! every key optional.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axum::http::Uri;

use super::{FilterSource, FilterSourceError};
use crate::models::FilterSet;

/// Default location of the filter document
pub const DEFAULT_FILTER_FILE: &str = "./payload.json";

/// Reads the filter set from a JSON file, ignoring the request URI.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document once.
    pub async fn read(&self) -> Result<FilterSet, FilterSourceError> {
        let path = self.path.display().to_string();
        tracing::info!(path = %path, "reading filter document");

        let bytes = tokio::fs::read(&self.path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                FilterSourceError::NotFound { path: path.clone() }
            } else {
                FilterSourceError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let filters = serde_json::from_slice(&bytes)
            .map_err(|source| FilterSourceError::Malformed { path, source })?;
        tracing::debug!(?filters, "filter document read");
        Ok(filters)
    }
}

impl Default for JsonFileSource {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_FILE)
    }
}

#[async_trait]
impl FilterSource for JsonFileSource {
    async fn filters(&self, _uri: &Uri) -> Result<FilterSet, FilterSourceError> {
        self.read().await
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}
