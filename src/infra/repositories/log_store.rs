//! Audit log repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryOrder, Set,
};

use super::entities::log::{self, ActiveModel, Entity as LogEntity};
use crate::domain::LogEntry;
use crate::errors::{AppError, AppResult};

pub struct LogStore<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> LogStore<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// Append an entry attributed to `actor_id`.
    ///
    /// Runs on whatever connection the store was built from; inside a
    /// unit of work the entry commits or rolls back with the change it
    /// describes. The `audit` event is emitted once the row is written.
    pub async fn record(&self, actor_id: i32, action: impl Into<String>) -> AppResult<LogEntry> {
        let model = ActiveModel {
            id: NotSet,
            user_id: Set(actor_id),
            action: Set(action.into()),
            timestamp: Set(Utc::now()),
        }
        .insert(self.conn)
        .await?;

        tracing::info!(target: "audit", actor_id, entry_id = model.id, "{}", model.action);
        Ok(LogEntry::from(model))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<LogEntry>> {
        let result = LogEntity::find_by_id(id).one(self.conn).await?;
        Ok(result.map(LogEntry::from))
    }

    /// All entries, newest first.
    pub async fn list(&self) -> AppResult<Vec<LogEntry>> {
        let models = LogEntity::find()
            .order_by_desc(log::Column::Timestamp)
            .order_by_desc(log::Column::Id)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(LogEntry::from).collect())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = LogEntity::delete_by_id(id).exec(self.conn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    pub async fn count(&self) -> AppResult<u64> {
        Ok(LogEntity::find().count(self.conn).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Database;
    use sea_orm::ConnectOptions;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Collects formatted tracing output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    async fn unmigrated() -> Database {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::connect_with(options).await.unwrap()
    }

    #[tokio::test]
    async fn test_audit_event_follows_successful_insert() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let db = unmigrated().await;
        let store = LogStore::new(db.connection());

        assert!(store.record(1, "Asset (ID: 1) deleted by ghost").await.is_err());
        assert!(!captured.text().contains("deleted by ghost"));

        db.run_migrations().await.unwrap();
        let entry = LogStore::new(db.connection())
            .record(1, "Asset (ID: 1) deleted by admin")
            .await
            .unwrap();

        let output = captured.text();
        assert!(output.contains("deleted by admin"));
        assert!(output.contains(&format!("entry_id={}", entry.id)));
    }
}
