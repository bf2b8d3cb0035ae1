//! Audit log entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One immutable line of the audit trail.
///
/// `user_id` is the acting user at the time of the action. It is not a
/// foreign key: the user may have been deleted since.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogEntry {
    pub id: i32,
    pub user_id: i32,
    #[schema(example = "Asset (ID: 4, Name: Laptop1) created by admin (ID: 1)")]
    pub action: String,
    pub timestamp: DateTime<Utc>,
}
