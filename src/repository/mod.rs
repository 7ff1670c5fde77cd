//! Repository layer for record store operations

pub mod visitors;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::visitor::{NewVisitor, Visitor, VisitorStatus},
};

/// Persistence seam for visitor records.
///
/// Implementations must make each call atomic per record; concurrent status
/// updates on the same record resolve as last writer wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Persist a new record and return it with its assigned id
    async fn insert(&self, visitor: &NewVisitor) -> AppResult<Visitor>;

    /// All records, in store order
    async fn list(&self) -> AppResult<Vec<Visitor>>;

    /// Overwrite the status of one record. Fails with `NotFound` when no
    /// record has this id.
    async fn update_status(&self, id: Uuid, status: VisitorStatus) -> AppResult<()>;

    /// Round-trip to the store, used by readiness checks
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub visitors: visitors::VisitorsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            visitors: visitors::VisitorsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Visitor store handle for the service layer
    pub fn visitor_store(&self) -> Arc<dyn VisitorStore> {
        Arc::new(self.visitors.clone())
    }
}
