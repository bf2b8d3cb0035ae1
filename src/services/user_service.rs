//! User service - Account management for Admins and account owners.

use async_trait::async_trait;
use std::sync::Arc;

use super::audit_service::refuse;
use super::checks;
use crate::config::{UNCHANGED_PASSWORD_PLACEHOLDER, USERNAME_MAX_LENGTH};
use crate::domain::{
    AccessPolicy, Action, Actor, NewUser, Outcome, Password, User, UserChanges, UserEdit,
    UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub const USER_EXISTS: &str = "A user already exists with this name";
pub const SELF_DEMOTION: &str = "You cannot demote yourself to User";

/// A deleted account, and whether the actor removed their own.
#[derive(Debug, Clone)]
pub struct UserRemoval {
    pub user: User,
    pub self_deleted: bool,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Admin sees every account; anyone else sees only themselves.
    async fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>>;

    async fn create_user(&self, actor: &Actor, new_user: NewUser) -> AppResult<Outcome<User>>;

    /// Edit an account. An Admin demoting themselves is declined.
    async fn edit_user(&self, actor: &Actor, id: i32, edit: UserEdit) -> AppResult<Outcome<User>>;

    /// Delete an account along with every asset it owns.
    async fn delete_user(&self, actor: &Actor, id: i32) -> AppResult<UserRemoval>;

    async fn promote_user(&self, actor: &Actor, id: i32) -> AppResult<User>;
}

pub struct UserRegistry {
    uow: Arc<dyn UnitOfWork>,
}

impl UserRegistry {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

fn required_username(username: String) -> AppResult<String> {
    checks::required(
        username,
        USERNAME_MAX_LENGTH,
        "Username is required",
        "Username is too long",
    )
}

#[async_trait]
impl UserService for UserRegistry {
    async fn list_users(&self, actor: &Actor) -> AppResult<Vec<User>> {
        let tx = self.uow.begin().await?;

        let users = tx.users().list(AccessPolicy::user_scope(actor)).await?;
        tx.audit()
            .record(actor.id, format!("Users viewed by {}", actor))
            .await?;
        tx.commit().await?;

        Ok(users)
    }

    async fn create_user(&self, actor: &Actor, new_user: NewUser) -> AppResult<Outcome<User>> {
        let tx = self.uow.begin().await?;

        if let Err(denial) = AccessPolicy::decide(actor, Action::CreateUser).into_result() {
            let message = format!("User creation attempt by {}", actor);
            return refuse(tx, actor, denial, message).await;
        }

        let username = required_username(new_user.username)?;
        let role = match new_user.role.as_deref() {
            Some(requested) => AccessPolicy::effective_role(actor, requested)?,
            None => UserRole::User,
        };

        if tx.users().find_by_username(&username).await?.is_some() {
            tx.rollback().await;
            return Ok(Outcome::declined(USER_EXISTS));
        }

        let password_hash = Password::new(&new_user.password)?.into_string();
        let user = match tx.users().insert(username, password_hash, role).await {
            Ok(user) => user,
            Err(AppError::Conflict(_)) => return Ok(Outcome::declined(USER_EXISTS)),
            Err(e) => return Err(e),
        };

        tx.audit()
            .record(actor.id, format!("User (ID: {}) created by {}", user.id, actor))
            .await?;
        tx.commit().await?;

        Ok(Outcome::Applied(user))
    }

    async fn edit_user(&self, actor: &Actor, id: i32, edit: UserEdit) -> AppResult<Outcome<User>> {
        let tx = self.uow.begin().await?;

        if let Err(denial) =
            AccessPolicy::decide(actor, Action::EditUser { target_id: id }).into_result()
        {
            let message = format!("User (ID: {}) tried to be edited by {}", id, actor);
            return refuse(tx, actor, denial, message).await;
        }

        let role = match edit.role.as_deref() {
            Some(requested) => Some(AccessPolicy::effective_role(actor, requested)?),
            None if !actor.is_admin() => Some(UserRole::User),
            None => None,
        };

        if let Some(role) = role {
            if AccessPolicy::is_self_demotion(actor, id, role) {
                tx.audit()
                    .record(
                        actor.id,
                        format!("Admin (ID: {}) tried to demote themself", actor.id),
                    )
                    .await?;
                tx.commit().await?;
                return Ok(Outcome::declined(SELF_DEMOTION));
            }
        }

        if tx.users().find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let username = required_username(edit.username)?;
        let password_hash = if edit.password == UNCHANGED_PASSWORD_PLACEHOLDER {
            None
        } else {
            Some(Password::new(&edit.password)?.into_string())
        };

        let user = tx
            .users()
            .update(
                id,
                UserChanges {
                    username: Some(username),
                    password_hash,
                    role,
                },
            )
            .await?;

        tx.audit()
            .record(actor.id, format!("User (ID: {}) updated by {}", user.id, actor))
            .await?;
        tx.commit().await?;

        Ok(Outcome::Applied(user))
    }

    async fn delete_user(&self, actor: &Actor, id: i32) -> AppResult<UserRemoval> {
        let tx = self.uow.begin().await?;

        if let Err(denial) =
            AccessPolicy::decide(actor, Action::DeleteUser { target_id: id }).into_result()
        {
            let message = format!("User (ID: {}) tried to be deleted by {}", id, actor);
            return refuse(tx, actor, denial, message).await;
        }

        let user = tx.users().find_by_id(id).await?.ok_or(AppError::NotFound)?;

        let removed = tx.assets().delete_by_owner(id).await?;
        tx.users().delete(id).await?;
        tracing::debug!(user_id = id, removed, "Cascaded asset removal");

        let self_deleted = actor.id == id;
        let message = if self_deleted {
            format!("User (ID: {}) deleted themself", id)
        } else {
            format!("User (ID: {}) deleted by {}", id, actor)
        };
        tx.audit().record(actor.id, message).await?;
        tx.commit().await?;

        Ok(UserRemoval { user, self_deleted })
    }

    async fn promote_user(&self, actor: &Actor, id: i32) -> AppResult<User> {
        let tx = self.uow.begin().await?;

        if let Err(denial) = AccessPolicy::decide(actor, Action::PromoteUser).into_result() {
            let message = format!("User (ID: {}) tried to be promoted by {}", id, actor);
            return refuse(tx, actor, denial, message).await;
        }

        let changes = UserChanges {
            role: Some(UserRole::Admin),
            ..UserChanges::default()
        };
        let user = tx.users().update(id, changes).await?;

        tx.audit()
            .record(
                actor.id,
                format!("User (ID: {}) promoted to Admin by {}", user.id, actor),
            )
            .await?;
        tx.commit().await?;

        Ok(user)
    }
}
