//! Visitor check-ins repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::VisitorStore;
use crate::{
    error::{AppError, AppResult},
    models::visitor::{NewVisitor, Visitor, VisitorStatus},
};

#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Pool<Postgres>,
}

impl VisitorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitorStore for VisitorsRepository {
    async fn insert(&self, visitor: &NewVisitor) -> AppResult<Visitor> {
        let row = sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO checkins (name, purpose, time_in, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, purpose, time_in, status
            "#,
        )
        .bind(&visitor.name)
        .bind(&visitor.purpose)
        .bind(visitor.time_in)
        .bind(visitor.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self) -> AppResult<Vec<Visitor>> {
        let rows = sqlx::query_as::<_, Visitor>(
            "SELECT id, name, purpose, time_in, status FROM checkins",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_status(&self, id: Uuid, status: VisitorStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE checkins SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Visitor {} not found", id)));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
