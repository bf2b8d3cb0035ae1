//! Audit service - Reading and pruning the audit trail.
//!
//! Writing happens through [`TransactionContext::audit`] inside the
//! operation being recorded; this service only exposes the Admin views.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{AccessPolicy, Action, Actor, Denial, LogEntry};
use crate::errors::{AppError, AppResult};
use crate::infra::{TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Record a refused attempt, commit it, and fail with the denial.
///
/// The entry must survive even though the operation did not happen,
/// so it commits on its own before the error is returned.
pub(crate) async fn refuse<T>(
    tx: TransactionContext,
    actor: &Actor,
    denial: Denial,
    message: String,
) -> AppResult<T> {
    tx.audit().record(actor.id, message).await?;
    tx.commit().await?;

    tracing::warn!(actor_id = actor.id, %denial, "Access denied");
    Err(AppError::from(denial))
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuditService: Send + Sync {
    /// All entries, newest first. Admin only.
    async fn list_logs(&self, actor: &Actor) -> AppResult<Vec<LogEntry>>;

    /// Hard-delete one entry. Admin only.
    async fn delete_log(&self, actor: &Actor, id: i32) -> AppResult<LogEntry>;
}

pub struct AuditTrail {
    uow: Arc<dyn UnitOfWork>,
}

impl AuditTrail {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl AuditService for AuditTrail {
    async fn list_logs(&self, actor: &Actor) -> AppResult<Vec<LogEntry>> {
        let tx = self.uow.begin().await?;

        if let Err(denial) = AccessPolicy::decide(actor, Action::ViewLogs).into_result() {
            let message = format!("Unauthorised logs access attempt by {}", actor);
            return refuse(tx, actor, denial, message).await;
        }

        let entries = tx.audit().list().await?;
        tx.audit()
            .record(actor.id, format!("Logs viewed by {}", actor))
            .await?;
        tx.commit().await?;

        Ok(entries)
    }

    async fn delete_log(&self, actor: &Actor, id: i32) -> AppResult<LogEntry> {
        let tx = self.uow.begin().await?;

        if let Err(denial) = AccessPolicy::decide(actor, Action::DeleteLog).into_result() {
            let message = format!("Log (ID: {}) tried to be deleted by {}", id, actor);
            return refuse(tx, actor, denial, message).await;
        }

        let entry = tx.audit().find_by_id(id).await?.ok_or(AppError::NotFound)?;
        tx.audit().delete(id).await?;
        tx.audit()
            .record(actor.id, format!("Log (ID: {}) deleted by {}", id, actor))
            .await?;
        tx.commit().await?;

        Ok(entry)
    }
}
