//! Filters taken from the request's own query string

use async_trait::async_trait;
use axum::extract::Query;
use axum::http::Uri;

use super::{FilterSource, FilterSourceError};
use crate::models::{FilterSet, FilterValue};

/// Keep the first non-blank occurrence of each recognized key; blank values,
/// later repeats and unknown keys are ignored.
fn collect_filters(pairs: Vec<(String, String)>) -> FilterSet {
    let mut filters = FilterSet::new();
    for (key, value) in pairs {
        let slot = match key.as_str() {
            "year" => &mut filters.year,
            "city" => &mut filters.city,
            "state" => &mut filters.state,
            _ => continue,
        };
        if slot.is_none() && !value.is_empty() {
            *slot = Some(if key == "year" {
                FilterValue::from_text(&value)
            } else {
                FilterValue::Text(value)
            });
        }
    }
    filters
}

/// Reads `year`, `city` and `state` from the URI query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryStringSource;

impl QueryStringSource {
    pub fn parse(uri: &Uri) -> Result<FilterSet, FilterSourceError> {
        if uri.query().is_none() {
            return Ok(FilterSet::new());
        }

        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map_err(|e| FilterSourceError::QueryString(e.body_text()))?;
        Ok(collect_filters(pairs))
    }
}

#[async_trait]
impl FilterSource for QueryStringSource {
    async fn filters(&self, uri: &Uri) -> Result<FilterSet, FilterSourceError> {
        Self::parse(uri)
    }

    fn describe(&self) -> String {
        "query string".to_owned()
    }
}
