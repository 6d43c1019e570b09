//! API error types with IntoResponse
//!
//! Every internal failure looks the same from outside: a 500 with a generic
//! body. The underlying error is logged here, once, with full detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::filters::FilterSourceError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Path outside `/properties` (404)
    NotFound { path: String },

    /// Anything but GET on `/properties` (405)
    MethodNotAllowed { method: String },

    /// Filter set could not be obtained (500, logged)
    Filters(FilterSourceError),

    /// Connection or query failure (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Filters(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::NotFound { path } => {
                tracing::warn!(path = %path, "request path not found");
                json!({
                    "error": "not_found",
                    "message": "Not Found"
                })
            }
            Self::MethodNotAllowed { method } => {
                tracing::warn!(method = %method, "method not allowed");
                json!({
                    "error": "method_not_allowed",
                    "message": "Method Not Allowed"
                })
            }
            Self::Filters(e) => {
                tracing::error!(error = %e, "error loading filters");
                internal_error_body()
            }
            Self::Database(e) => {
                tracing::error!(error = %e, "error querying properties");
                internal_error_body()
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal_error_body() -> serde_json::Value {
    json!({
        "error": "internal_error",
        "message": "Internal Server Error"
    })
}

impl From<FilterSourceError> for ApiError {
    fn from(e: FilterSourceError) -> Self {
        Self::Filters(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}
