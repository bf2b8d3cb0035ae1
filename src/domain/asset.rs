//! Asset domain entity and its display projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Asset domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Asset {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub asset_type: Option<String>,
    pub serial_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub in_use: bool,
    pub approved: bool,
    pub owner_id: Option<i32>,
    pub department_id: Option<i32>,
}

/// Checked asset fields, ready to store.
///
/// `approved` is only honoured on an edit by an Admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFields {
    pub name: String,
    pub description: Option<String>,
    pub asset_type: Option<String>,
    pub serial_number: Option<String>,
    pub in_use: bool,
    pub approved: bool,
    pub owner_id: Option<i32>,
    pub department_id: Option<i32>,
}

/// Asset fields as a form submitted them.
///
/// The service checks lengths and parses the ids into [`AssetFields`]
/// only after the access policy has allowed the change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDraft {
    pub name: String,
    pub description: Option<String>,
    pub asset_type: Option<String>,
    pub serial_number: Option<String>,
    pub in_use: bool,
    pub approved: bool,
    pub owner_id: Option<String>,
    pub department_id: Option<String>,
}

impl From<AssetFields> for AssetDraft {
    fn from(fields: AssetFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            asset_type: fields.asset_type,
            serial_number: fields.serial_number,
            in_use: fields.in_use,
            approved: fields.approved,
            owner_id: fields.owner_id.map(|id| id.to_string()),
            department_id: fields.department_id.map(|id| id.to_string()),
        }
    }
}

/// Asset row annotated with the current owner and department names.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssetView {
    #[serde(flatten)]
    pub asset: Asset,
    #[schema(example = "jdoe")]
    pub owner_username: Option<String>,
    #[schema(example = "Engineering")]
    pub department_name: Option<String>,
}

/// Counters shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Metrics {
    pub total_assets: u64,
    pub pending_assets: u64,
    pub total_users: u64,
    pub total_departments: u64,
}

/// Landing page data: assets awaiting approval plus global counters.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dashboard {
    pub pending: Vec<AssetView>,
    pub metrics: Metrics,
}
