//! Audit log database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::LogEntry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Acting user; may point at a user deleted since
    pub user_id: i32,
    #[sea_orm(column_type = "Text")]
    pub action: String,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LogEntry {
    fn from(model: Model) -> Self {
        LogEntry {
            id: model.id,
            user_id: model.user_id,
            action: model.action,
            timestamp: model.timestamp,
        }
    }
}
