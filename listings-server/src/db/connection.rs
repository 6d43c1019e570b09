//! Per-request database connections
//!
//! A [`Connector`] opens one [`PropertySession`] per request. There is no
//! pool: [`fetch_properties`] acquires a session, runs the listings query and
//! closes the session on every path before returning the query outcome.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Number;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Connection, MySql, MySqlConnection, Row};

use super::query::PropertyQuery;
use crate::config::DatabaseConfig;
use crate::models::{FilterValue, PropertyRecord};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("failed to connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("failed to close connection: {0}")]
    Release(#[source] sqlx::Error),

    #[error("query task failed: {0}")]
    Task(#[source] tokio::task::JoinError),
}

/// Opens request-scoped sessions against the property store.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn PropertySession>, DbError>;
}

/// A live session owned by a single request.
#[async_trait]
pub trait PropertySession: Send {
    async fn query_properties(
        &mut self,
        query: &PropertyQuery,
    ) -> Result<Vec<PropertyRecord>, DbError>;

    /// Close the session. Consumes it so it cannot be reused.
    async fn release(self: Box<Self>) -> Result<(), DbError>;
}

/// Run the listings query on a fresh session and always release it.
///
/// The acquire/query/release sequence runs on its own task, so dropping the
/// caller (a client hanging up mid-query) does not skip the release. A
/// failure to close the session is logged and does not mask the query
/// outcome.
pub async fn fetch_properties(
    connector: Arc<dyn Connector>,
    query: PropertyQuery,
) -> Result<Vec<PropertyRecord>, DbError> {
    tokio::spawn(async move {
        let mut session = connector.acquire().await?;

        let result = session.query_properties(&query).await;

        if let Err(e) = session.release().await {
            tracing::warn!(error = %e, "error releasing database connection");
        }

        result
    })
    .await
    .map_err(DbError::Task)?
}

/// MySQL connector; connects fresh on every call to `acquire`.
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
    target: String,
}

impl MySqlConnector {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        Self {
            options,
            target: config.target(),
        }
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn acquire(&self) -> Result<Box<dyn PropertySession>, DbError> {
        match MySqlConnection::connect_with(&self.options).await {
            Ok(conn) => {
                tracing::info!(target_db = %self.target, "database connection established");
                Ok(Box::new(MySqlSession { conn }))
            }
            Err(source) => {
                tracing::error!(target_db = %self.target, error = %source, "error connecting to database");
                Err(DbError::Connection {
                    target: self.target.clone(),
                    source,
                })
            }
        }
    }
}

struct MySqlSession {
    conn: MySqlConnection,
}

#[async_trait]
impl PropertySession for MySqlSession {
    async fn query_properties(
        &mut self,
        query: &PropertyQuery,
    ) -> Result<Vec<PropertyRecord>, DbError> {
        let rows = bind_params(sqlx::query(&query.sql), &query.params)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "error executing query");
                DbError::Query(e)
            })?;

        rows.iter().map(decode_record).collect()
    }

    async fn release(self: Box<Self>) -> Result<(), DbError> {
        self.conn.close().await.map_err(DbError::Release)
    }
}

fn bind_params<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [FilterValue],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            FilterValue::Int(v) => query.bind(*v),
            FilterValue::Float(v) => query.bind(*v),
            FilterValue::Bool(v) => query.bind(*v),
            FilterValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

fn decode_record(row: &MySqlRow) -> Result<PropertyRecord, DbError> {
    Ok(PropertyRecord {
        address: row.try_get("address").map_err(DbError::Query)?,
        city: row.try_get("city").map_err(DbError::Query)?,
        state: row.try_get("state").map_err(DbError::Query)?,
        price: decode_price(row)?,
        description: row.try_get("description").map_err(DbError::Query)?,
    })
}

/// Price may be stored as an integer, a float or a DECIMAL.
fn decode_price(row: &MySqlRow) -> Result<Number, DbError> {
    if let Ok(v) = row.try_get::<i64, _>("price") {
        return Ok(Number::from(v));
    }
    if let Ok(v) = row.try_get::<u64, _>("price") {
        return Ok(Number::from(v));
    }
    if let Ok(v) = row.try_get::<f64, _>("price") {
        if let Some(n) = Number::from_f64(v) {
            return Ok(n);
        }
    }

    // DECIMAL columns arrive as their textual representation
    let raw: String = row.try_get_unchecked("price").map_err(DbError::Query)?;
    parse_decimal(&raw).ok_or_else(|| {
        DbError::Query(sqlx::Error::ColumnDecode {
            index: "price".to_owned(),
            source: format!("unrepresentable price value {:?}", raw).into(),
        })
    })
}

fn parse_decimal(raw: &str) -> Option<Number> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(Number::from(v));
    }
    // "350000000.00" keeps its integer form
    if let Some((whole, frac)) = raw.split_once('.') {
        if frac.chars().all(|c| c == '0') {
            if let Ok(v) = whole.parse::<i64>() {
                return Some(Number::from(v));
            }
        }
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}
