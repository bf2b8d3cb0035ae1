//! Asset database entity for SeaORM.
//!
//! Owner and department names are resolved by explicit lookups in the
//! asset service, so no relations are declared here.

use sea_orm::entity::prelude::*;

use crate::domain::Asset;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_name = "type")]
    pub asset_type: Option<String>,
    #[sea_orm(unique)]
    pub serial_number: Option<String>,
    pub created_at: DateTimeUtc,
    pub in_use: bool,
    pub approved: bool,
    pub owner_id: Option<i32>,
    pub department_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Asset {
    fn from(model: Model) -> Self {
        Asset {
            id: model.id,
            name: model.name,
            description: model.description,
            asset_type: model.asset_type,
            serial_number: model.serial_number,
            created_at: model.created_at,
            in_use: model.in_use,
            approved: model.approved,
            owner_id: model.owner_id,
            department_id: model.department_id,
        }
    }
}
