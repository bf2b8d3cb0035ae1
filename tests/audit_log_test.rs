mod common;

use asset_tracker::domain::UserRole;
use asset_tracker::errors::AppError;
use asset_tracker::services::{AuditService, DepartmentService, ServiceContainer};
use common::Harness;

#[tokio::test]
async fn test_logs_are_listed_newest_first() {
    let h = Harness::new().await;
    let admin = h.admin().await;
    let departments = h.services.departments();

    departments.create_department(&admin, "First".into()).await.unwrap();
    departments.create_department(&admin, "Second".into()).await.unwrap();

    let entries = h.services.audit().list_logs(&admin).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries[0].action.starts_with("Department Second"));
    assert!(entries[1].action.starts_with("Department First"));
    assert!(entries[0].timestamp >= entries[1].timestamp);

    // The read itself is recorded after the snapshot
    assert_eq!(h.logs().await[0].action, "Logs viewed by admin (ID: 1)");
}

#[tokio::test]
async fn test_non_admin_log_access_is_denied_and_logged() {
    let h = Harness::new().await;
    let alice = h.user("alice", UserRole::User).await;

    let result = h.services.audit().list_logs(&alice).await;

    assert!(matches!(result, Err(AppError::Forbidden)));
    let logs = h.logs().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_id, alice.id);
    assert_eq!(
        logs[0].action,
        format!("Unauthorised logs access attempt by alice (ID: {})", alice.id)
    );
}

#[tokio::test]
async fn test_admin_deletes_log_entry() {
    let h = Harness::new().await;
    let admin = h.admin().await;
    h.services
        .departments()
        .create_department(&admin, "Finance".into())
        .await
        .unwrap();
    let target = h.logs().await.remove(0);

    let deleted = h.services.audit().delete_log(&admin, target.id).await.unwrap();
    assert_eq!(deleted, target);

    let logs = h.logs().await;
    assert!(logs.iter().all(|l| l.id != target.id));
    assert_eq!(
        logs[0].action,
        format!("Log (ID: {}) deleted by admin (ID: 1)", target.id)
    );
}

#[tokio::test]
async fn test_delete_log_rules() {
    let h = Harness::new().await;
    let admin = h.admin().await;
    let alice = h.user("alice", UserRole::User).await;
    let audit = h.services.audit();

    let missing = audit.delete_log(&admin, 404).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    assert_eq!(h.log_count().await, 0);

    let denied = audit.delete_log(&alice, 404).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));
    assert!(h.logs().await[0].action.contains("Log (ID: 404) tried to be deleted"));
}
