//! Department service - The department registry.

use async_trait::async_trait;
use std::sync::Arc;

use super::audit_service::refuse;
use super::checks;
use crate::config::NAME_MAX_LENGTH;
use crate::domain::{AccessPolicy, Action, Actor, Department, Outcome};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub const DEPARTMENT_EXISTS: &str = "A department already exists with this name";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DepartmentService: Send + Sync {
    async fn list_departments(&self, actor: &Actor) -> AppResult<Vec<Department>>;

    /// Admin only. An existing name declines without logging.
    async fn create_department(&self, actor: &Actor, name: String)
        -> AppResult<Outcome<Department>>;

    /// Admin only. Renames are not pre-checked for duplicates.
    async fn edit_department(&self, actor: &Actor, id: i32, name: String)
        -> AppResult<Department>;

    /// Admin only. Deletes the department's assets, then the department.
    async fn delete_department(&self, actor: &Actor, id: i32) -> AppResult<Department>;
}

pub struct DepartmentRegistry {
    uow: Arc<dyn UnitOfWork>,
}

impl DepartmentRegistry {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }
}

fn required_name(name: String) -> AppResult<String> {
    checks::required(
        name,
        NAME_MAX_LENGTH,
        "Department name is required",
        "Department name is too long",
    )
}

#[async_trait]
impl DepartmentService for DepartmentRegistry {
    async fn list_departments(&self, actor: &Actor) -> AppResult<Vec<Department>> {
        let tx = self.uow.begin().await?;

        let departments = tx.departments().list().await?;
        tx.audit()
            .record(actor.id, format!("Departments viewed by {}", actor))
            .await?;
        tx.commit().await?;

        Ok(departments)
    }

    async fn create_department(
        &self,
        actor: &Actor,
        name: String,
    ) -> AppResult<Outcome<Department>> {
        let tx = self.uow.begin().await?;

        if let Err(denial) = AccessPolicy::decide(actor, Action::CreateDepartment).into_result() {
            let message = format!("Unauthorised department creation attempt by {}", actor);
            return refuse(tx, actor, denial, message).await;
        }

        let name = required_name(name)?;
        if tx.departments().find_by_name(&name).await?.is_some() {
            tx.rollback().await;
            return Ok(Outcome::declined(DEPARTMENT_EXISTS));
        }

        // A concurrent insert of the same name loses on the unique index
        let department = match tx.departments().insert(name).await {
            Ok(department) => department,
            Err(AppError::Conflict(_)) => return Ok(Outcome::declined(DEPARTMENT_EXISTS)),
            Err(e) => return Err(e),
        };

        tx.audit()
            .record(
                actor.id,
                format!("Department {} created by {}", department.name, actor),
            )
            .await?;
        tx.commit().await?;

        Ok(Outcome::Applied(department))
    }

    async fn edit_department(
        &self,
        actor: &Actor,
        id: i32,
        name: String,
    ) -> AppResult<Department> {
        let tx = self.uow.begin().await?;

        if let Err(denial) = AccessPolicy::decide(actor, Action::EditDepartment).into_result() {
            let message = format!("Department (ID: {}) tried to be edited by {}", id, actor);
            return refuse(tx, actor, denial, message).await;
        }

        let name = required_name(name)?;
        let department = tx.departments().rename(id, name).await?;
        tx.audit()
            .record(
                actor.id,
                format!(
                    "Department (ID: {}) updated to {} by {}",
                    department.id, department.name, actor
                ),
            )
            .await?;
        tx.commit().await?;

        Ok(department)
    }

    async fn delete_department(&self, actor: &Actor, id: i32) -> AppResult<Department> {
        let tx = self.uow.begin().await?;

        if let Err(denial) = AccessPolicy::decide(actor, Action::DeleteDepartment).into_result() {
            let message = format!("Department (ID: {}) tried to be deleted by {}", id, actor);
            return refuse(tx, actor, denial, message).await;
        }

        let department = tx
            .departments()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Dependants first, then the parent, in the same transaction
        let removed = tx.assets().delete_by_department(id).await?;
        tx.departments().delete(id).await?;
        tracing::debug!(department_id = id, removed, "Cascaded asset removal");

        tx.audit()
            .record(
                actor.id,
                format!(
                    "Department (ID: {}, Name: {}) deleted by {}",
                    department.id, department.name, actor
                ),
            )
            .await?;
        tx.commit().await?;

        Ok(department)
    }
}
