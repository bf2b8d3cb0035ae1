//! Asset repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};

use super::entities::asset::{self, ActiveModel, Entity as AssetEntity};
use crate::domain::{Asset, AssetFields, Scope};
use crate::errors::{AppError, AppResult};

/// Criteria for listing and counting assets. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetFilter {
    pub owner_id: Option<i32>,
    pub department_id: Option<i32>,
    pub approved: Option<bool>,
}

impl AssetFilter {
    /// Restrict to what a reader with `scope` may see.
    pub fn scoped(scope: Scope) -> Self {
        match scope {
            Scope::All => Self::default(),
            Scope::Only(owner_id) => Self {
                owner_id: Some(owner_id),
                ..Self::default()
            },
        }
    }

    pub fn in_department(mut self, department_id: i32) -> Self {
        self.department_id = Some(department_id);
        self
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }

    fn apply(&self, mut query: Select<AssetEntity>) -> Select<AssetEntity> {
        if let Some(owner_id) = self.owner_id {
            query = query.filter(asset::Column::OwnerId.eq(owner_id));
        }
        if let Some(department_id) = self.department_id {
            query = query.filter(asset::Column::DepartmentId.eq(department_id));
        }
        if let Some(approved) = self.approved {
            query = query.filter(asset::Column::Approved.eq(approved));
        }
        query
    }
}

pub struct AssetStore<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> AssetStore<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Asset>> {
        let result = AssetEntity::find_by_id(id).one(self.conn).await?;
        Ok(result.map(Asset::from))
    }

    /// Assets matching `filter`, ordered by id.
    pub async fn list(&self, filter: AssetFilter) -> AppResult<Vec<Asset>> {
        let models = filter
            .apply(AssetEntity::find())
            .order_by_asc(asset::Column::Id)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Asset::from).collect())
    }

    pub async fn count(&self, filter: AssetFilter) -> AppResult<u64> {
        Ok(filter.apply(AssetEntity::find()).count(self.conn).await?)
    }

    /// Insert a new asset stamped with the current time.
    pub async fn insert(&self, fields: AssetFields) -> AppResult<Asset> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(fields.name),
            description: Set(fields.description),
            asset_type: Set(fields.asset_type),
            serial_number: Set(fields.serial_number),
            created_at: Set(Utc::now()),
            in_use: Set(fields.in_use),
            approved: Set(fields.approved),
            owner_id: Set(fields.owner_id),
            department_id: Set(fields.department_id),
        };

        let model = active_model.insert(self.conn).await?;
        Ok(Asset::from(model))
    }

    /// Overwrite every mutable field. `created_at` is never touched.
    pub async fn update(&self, id: i32, fields: AssetFields) -> AppResult<Asset> {
        let asset = AssetEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = asset.into();
        active.name = Set(fields.name);
        active.description = Set(fields.description);
        active.asset_type = Set(fields.asset_type);
        active.serial_number = Set(fields.serial_number);
        active.in_use = Set(fields.in_use);
        active.approved = Set(fields.approved);
        active.owner_id = Set(fields.owner_id);
        active.department_id = Set(fields.department_id);

        let model = active.update(self.conn).await?;
        Ok(Asset::from(model))
    }

    pub async fn set_approved(&self, id: i32, approved: bool) -> AppResult<Asset> {
        let asset = AssetEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = asset.into();
        active.approved = Set(approved);

        let model = active.update(self.conn).await?;
        Ok(Asset::from(model))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = AssetEntity::delete_by_id(id).exec(self.conn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Remove every asset owned by `owner_id`; returns how many went.
    pub async fn delete_by_owner(&self, owner_id: i32) -> AppResult<u64> {
        let result = AssetEntity::delete_many()
            .filter(asset::Column::OwnerId.eq(owner_id))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Remove every asset assigned to `department_id`; returns how many went.
    pub async fn delete_by_department(&self, department_id: i32) -> AppResult<u64> {
        let result = AssetEntity::delete_many()
            .filter(asset::Column::DepartmentId.eq(department_id))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_filter() {
        assert_eq!(AssetFilter::scoped(Scope::All), AssetFilter::default());
        assert_eq!(AssetFilter::scoped(Scope::Only(3)).owner_id, Some(3));
    }

    #[test]
    fn test_filter_builders() {
        let filter = AssetFilter::scoped(Scope::Only(3)).approved(false).in_department(9);
        assert_eq!(
            filter,
            AssetFilter {
                owner_id: Some(3),
                department_id: Some(9),
                approved: Some(false),
            }
        );
    }
}
