//! User repository.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{Scope, User, UserChanges, UserRole};
use crate::errors::{AppError, AppResult};

/// User repository bound to a connection or an open transaction.
pub struct UserStore<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> UserStore<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    /// Users within `scope`, ordered by id.
    pub async fn list(&self, scope: Scope) -> AppResult<Vec<User>> {
        let mut query = UserEntity::find().order_by_asc(user::Column::Id);
        if let Scope::Only(id) = scope {
            query = query.filter(user::Column::Id.eq(id));
        }

        let models = query.all(self.conn).await.map_err(AppError::from)?;
        Ok(models.into_iter().map(User::from).collect())
    }

    /// Users with any of the given ids; missing ids are skipped.
    pub async fn find_many(&self, ids: Vec<i32>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(self.conn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    pub async fn insert(
        &self,
        username: String,
        password_hash: String,
        role: UserRole,
    ) -> AppResult<User> {
        let active_model = ActiveModel {
            id: NotSet,
            username: Set(username),
            password_hash: Set(password_hash),
            role: Set(role.into()),
        };

        let model = active_model.insert(self.conn).await?;
        Ok(User::from(model))
    }

    pub async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();

        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(role) = changes.role {
            active.role = Set(role.into());
        }

        let model = active.update(self.conn).await?;
        Ok(User::from(model))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(self.conn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    pub async fn count(&self) -> AppResult<u64> {
        Ok(UserEntity::find().count(self.conn).await?)
    }
}
