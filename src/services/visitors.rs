//! Visitor check-in lifecycle service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::visitor::{NewVisitor, SubmitCheckin, Visitor, VisitorStatus},
    repository::VisitorStore,
};

#[derive(Clone)]
pub struct VisitorsService {
    store: Arc<dyn VisitorStore>,
}

impl VisitorsService {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    /// Record a new check-in as `pending`, stamped with the server clock
    pub async fn submit(&self, data: &SubmitCheckin) -> AppResult<Visitor> {
        if data.name.is_empty() || data.purpose.is_empty() {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }

        let visitor = self
            .store
            .insert(&NewVisitor {
                name: data.name.clone(),
                purpose: data.purpose.clone(),
                time_in: Utc::now(),
                status: VisitorStatus::Pending,
            })
            .await?;

        tracing::info!(visitor_id = %visitor.id, "Check-in submitted");
        Ok(visitor)
    }

    /// List every check-in
    pub async fn list(&self) -> AppResult<Vec<Visitor>> {
        self.store.list().await
    }

    /// Set an admin decision on a check-in.
    ///
    /// Only `approved` and `rejected` are accepted. Decisions are not final:
    /// a later call overwrites an earlier one.
    pub async fn set_status(&self, visitor_id: &str, status: VisitorStatus) -> AppResult<()> {
        if visitor_id.is_empty() || !status.is_admin_decision() {
            return Err(AppError::Validation("Invalid request".to_string()));
        }

        // No record can carry an id that is not a UUID
        let id = Uuid::parse_str(visitor_id)
            .map_err(|_| AppError::NotFound(format!("Visitor {} not found", visitor_id)))?;

        self.store.update_status(id, status).await?;

        tracing::info!(visitor_id = %id, status = %status, "Visitor status updated");
        Ok(())
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{memory::MemoryVisitorStore, MockVisitorStore};

    fn checkin(name: &str, purpose: &str) -> SubmitCheckin {
        SubmitCheckin {
            name: name.to_string(),
            purpose: purpose.to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_creates_pending_record() {
        let store = Arc::new(MemoryVisitorStore::default());
        let service = VisitorsService::new(store.clone());

        let visitor = service.submit(&checkin("A", "B")).await.unwrap();
        assert_eq!(visitor.status, VisitorStatus::Pending);

        let records = store.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, visitor.id);
        assert_eq!(records[0].name, "A");
        assert_eq!(records[0].purpose, "B");
    }

    #[tokio::test]
    async fn test_submit_missing_field_creates_nothing() {
        let store = Arc::new(MemoryVisitorStore::default());
        let service = VisitorsService::new(store.clone());

        let err = service.submit(&checkin("", "B")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = service.submit(&checkin("A", "")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_last_decision_wins() {
        let store = Arc::new(MemoryVisitorStore::default());
        let service = VisitorsService::new(store.clone());
        let visitor = service.submit(&checkin("A", "B")).await.unwrap();
        let id = visitor.id.to_string();

        service.set_status(&id, VisitorStatus::Approved).await.unwrap();
        service.set_status(&id, VisitorStatus::Rejected).await.unwrap();

        let records = service.list().await.unwrap();
        assert_eq!(records[0].status, VisitorStatus::Rejected);
        assert_eq!(records[0].name, "A");
        assert_eq!(records[0].purpose, "B");
        assert_eq!(records[0].time_in, visitor.time_in);
    }

    #[tokio::test]
    async fn test_pending_is_not_an_admin_decision() {
        let store = Arc::new(MemoryVisitorStore::default());
        let service = VisitorsService::new(store.clone());
        let visitor = service.submit(&checkin("A", "B")).await.unwrap();

        let err = service
            .set_status(&visitor.id.to_string(), VisitorStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = service.set_status("", VisitorStatus::Approved).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_visitor() {
        let service = VisitorsService::new(Arc::new(MemoryVisitorStore::default()));

        let err = service
            .set_status("not-a-visitor", VisitorStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .set_status(&Uuid::new_v4().to_string(), VisitorStatus::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockVisitorStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let service = VisitorsService::new(Arc::new(store));

        let err = service.submit(&checkin("A", "B")).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_validation_happens_before_store() {
        let mut store = MockVisitorStore::new();
        store.expect_insert().never();
        store.expect_update_status().never();
        let service = VisitorsService::new(Arc::new(store));

        assert!(service.submit(&checkin("A", "")).await.is_err());
        assert!(service
            .set_status(&Uuid::new_v4().to_string(), VisitorStatus::Pending)
            .await
            .is_err());
    }
}
