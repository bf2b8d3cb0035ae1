//! Department repository.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::department::{self, ActiveModel, Entity as DepartmentEntity};
use crate::domain::Department;
use crate::errors::{AppError, AppResult};

pub struct DepartmentStore<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> DepartmentStore<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Department>> {
        let result = DepartmentEntity::find_by_id(id).one(self.conn).await?;
        Ok(result.map(Department::from))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        let result = DepartmentEntity::find()
            .filter(department::Column::Name.eq(name))
            .one(self.conn)
            .await?;

        Ok(result.map(Department::from))
    }

    pub async fn list(&self) -> AppResult<Vec<Department>> {
        let models = DepartmentEntity::find()
            .order_by_asc(department::Column::Id)
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Department::from).collect())
    }

    pub async fn find_many(&self, ids: Vec<i32>) -> AppResult<Vec<Department>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = DepartmentEntity::find()
            .filter(department::Column::Id.is_in(ids))
            .all(self.conn)
            .await?;

        Ok(models.into_iter().map(Department::from).collect())
    }

    pub async fn insert(&self, name: String) -> AppResult<Department> {
        let model = ActiveModel {
            id: NotSet,
            name: Set(name),
        }
        .insert(self.conn)
        .await?;

        Ok(Department::from(model))
    }

    pub async fn rename(&self, id: i32, name: String) -> AppResult<Department> {
        let department = DepartmentEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = department.into();
        active.name = Set(name);

        let model = active.update(self.conn).await?;
        Ok(Department::from(model))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = DepartmentEntity::delete_by_id(id).exec(self.conn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    pub async fn count(&self) -> AppResult<u64> {
        Ok(DepartmentEntity::find().count(self.conn).await?)
    }
}
