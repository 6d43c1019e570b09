//! In-memory connector for tests and local demos
//!
//! Serves a fixed set of records regardless of the filters and keeps count
//! of how many sessions were opened and closed.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::connection::{Connector, DbError, PropertySession};
use super::query::PropertyQuery;
use crate::models::PropertyRecord;

/// Connector backed by a shared vector of records.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    records: Vec<PropertyRecord>,
    fail_connect: AtomicBool,
    fail_query: AtomicBool,
    query_delay_ms: AtomicU64,
    acquired: AtomicUsize,
    released: AtomicUsize,
    executed: Mutex<Vec<PropertyQuery>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<PropertyRecord>) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                records,
                ..MemoryInner::default()
            }),
        }
    }

    /// Make every `acquire` fail as if the database were unreachable.
    pub fn failing_connections(self) -> Self {
        self.inner.fail_connect.store(true, Ordering::SeqCst);
        self
    }

    /// Make every query fail after the session was opened.
    pub fn failing_queries(self) -> Self {
        self.inner.fail_query.store(true, Ordering::SeqCst);
        self
    }

    /// Make every query take at least `delay` before answering.
    pub fn with_query_delay(self, delay: Duration) -> Self {
        self.inner
            .query_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
        self
    }

    /// Sessions successfully opened so far
    pub fn acquire_count(&self) -> usize {
        self.inner.acquired.load(Ordering::SeqCst)
    }

    /// Sessions closed so far
    pub fn release_count(&self) -> usize {
        self.inner.released.load(Ordering::SeqCst)
    }

    /// Queries executed so far, in order
    pub fn executed_queries(&self) -> Vec<PropertyQuery> {
        self.inner
            .executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn acquire(&self) -> Result<Box<dyn PropertySession>, DbError> {
        if self.inner.fail_connect.load(Ordering::SeqCst) {
            return Err(DbError::Connection {
                target: "memory".to_owned(),
                source: sqlx::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )),
            });
        }

        self.inner.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            inner: Arc::clone(&self.inner),
        }))
    }
}

struct MemorySession {
    inner: Arc<MemoryInner>,
}

#[async_trait]
impl PropertySession for MemorySession {
    async fn query_properties(
        &mut self,
        query: &PropertyQuery,
    ) -> Result<Vec<PropertyRecord>, DbError> {
        self.inner
            .executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());

        let delay = self.inner.query_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.inner.fail_query.load(Ordering::SeqCst) {
            return Err(DbError::Query(sqlx::Error::Protocol(
                "simulated query failure".to_owned(),
            )));
        }

        Ok(self.inner.records.clone())
    }

    async fn release(self: Box<Self>) -> Result<(), DbError> {
        self.inner.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
