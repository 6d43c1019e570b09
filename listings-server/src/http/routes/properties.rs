//! Property listings endpoint
//!
//! Any path starting with `/properties` is served by the listings query
//! (`/properties`, `/properties/`, `/properties?year=2020`). Everything else
//! is a 404 regardless of method.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};

use crate::db::{fetch_properties, PropertyQuery};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::PropertyRecord;

/// Path prefix served by this router
pub const PROPERTIES_PREFIX: &str = "/properties";

/// Entry point for every request; matches on the path prefix.
async fn dispatch(State(state): State<Arc<AppState>>, method: Method, uri: Uri) -> Response {
    tracing::info!(%method, path = %uri, "received request");

    if !uri.path().starts_with(PROPERTIES_PREFIX) {
        return ApiError::NotFound {
            path: uri.path().to_owned(),
        }
        .into_response();
    }

    if method != Method::GET {
        return ApiError::MethodNotAllowed {
            method: method.to_string(),
        }
        .into_response();
    }

    match list_properties(&state, &uri).await {
        Ok(records) => {
            tracing::info!(count = records.len(), "successfully handled request for properties");
            Json(records).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /properties - current listings matching the request's filters
pub async fn list_properties(
    state: &AppState,
    uri: &Uri,
) -> Result<Vec<PropertyRecord>, ApiError> {
    let filters = state.filters.filters(uri).await?;
    let query = PropertyQuery::build(&filters);
    tracing::debug!(params = query.params.len(), "built listings query");

    let records = fetch_properties(Arc::clone(&state.connector), query).await?;
    Ok(records)
}

/// Property routes; installed as the router fallback so prefix matching
/// covers every sub-path.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().fallback(dispatch)
}
