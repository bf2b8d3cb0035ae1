//! Unit of Work: one transaction per request.
//!
//! A service opens a [`TransactionContext`], reaches every repository
//! through it, and commits once the change and its audit entry are both
//! written. Returning early with `?` drops the context, which rolls the
//! transaction back.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::repositories::{AssetStore, DepartmentStore, LogStore, UserStore};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Begin a transaction.
    async fn begin(&self) -> AppResult<TransactionContext>;

    /// Shared connection for reads that write nothing.
    fn connection(&self) -> &DatabaseConnection;
}

/// Repository access within one open transaction.
pub struct TransactionContext {
    txn: DatabaseTransaction,
}

impl TransactionContext {
    pub fn users(&self) -> UserStore<'_, DatabaseTransaction> {
        UserStore::new(&self.txn)
    }

    pub fn departments(&self) -> DepartmentStore<'_, DatabaseTransaction> {
        DepartmentStore::new(&self.txn)
    }

    pub fn assets(&self) -> AssetStore<'_, DatabaseTransaction> {
        AssetStore::new(&self.txn)
    }

    /// The audit trail, written in this transaction.
    pub fn audit(&self) -> LogStore<'_, DatabaseTransaction> {
        LogStore::new(&self.txn)
    }

    pub async fn commit(self) -> AppResult<()> {
        self.txn.commit().await.map_err(AppError::from)
    }

    pub async fn rollback(self) {
        if let Err(e) = self.txn.rollback().await {
            tracing::error!("Transaction rollback failed: {}", e);
        }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    async fn begin(&self) -> AppResult<TransactionContext> {
        let txn = self.db.begin().await.map_err(AppError::from)?;
        Ok(TransactionContext { txn })
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}
