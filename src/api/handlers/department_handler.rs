//! Department handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::extractors::{FlashForm, FormPage};
use crate::api::flash::{FlashRedirect, RedirectBody};
use crate::api::AppState;
use crate::config::DEPARTMENTS_PAGE;
use crate::domain::{Actor, Department};
use crate::errors::AppResult;

const DEPARTMENT_NOT_FOUND: &str = "Department not found";

/// Department create/rename form
#[derive(Debug, Deserialize, ToSchema)]
pub struct DepartmentForm {
    #[serde(default)]
    #[schema(example = "Engineering")]
    pub name: String,
}

impl FormPage for DepartmentForm {
    const PAGE: &'static str = DEPARTMENTS_PAGE;
}

pub fn department_routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments))
        .route("/department/create", post(create_department))
        .route("/department/edit/:id", post(edit_department))
        .route("/department/delete/:id", post(delete_department))
}

/// List all departments
#[utoipa::path(
    get,
    path = "/departments",
    tag = "Departments",
    responses(
        (status = 200, description = "Every department", body = Vec<Department>),
        (status = 303, description = "Not logged in")
    ),
    security(("session_cookie" = []))
)]
pub async fn list_departments(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<Vec<Department>>> {
    Ok(Json(state.departments.list_departments(&actor).await?))
}

/// Create a department (Admin only)
#[utoipa::path(
    post,
    path = "/department/create",
    tag = "Departments",
    request_body(content = DepartmentForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Back to /departments", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn create_department(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    FlashForm(form): FlashForm<DepartmentForm>,
) -> AppResult<FlashRedirect> {
    let result = state.departments.create_department(&actor, form.name).await;

    FlashRedirect::settle(DEPARTMENTS_PAGE, result, DEPARTMENT_NOT_FOUND, |outcome| {
        FlashRedirect::outcome(DEPARTMENTS_PAGE, outcome, |d| {
            format!("Department {} created", d.name)
        })
    })
}

/// Rename a department (Admin only)
#[utoipa::path(
    post,
    path = "/department/edit/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    request_body(content = DepartmentForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Back to /departments", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn edit_department(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    FlashForm(form): FlashForm<DepartmentForm>,
) -> AppResult<FlashRedirect> {
    let result = state.departments.edit_department(&actor, id, form.name).await;

    FlashRedirect::settle(DEPARTMENTS_PAGE, result, DEPARTMENT_NOT_FOUND, |d| {
        FlashRedirect::success(DEPARTMENTS_PAGE, format!("Department {} updated", d.name))
    })
}

/// Delete a department and its assets (Admin only)
#[utoipa::path(
    post,
    path = "/department/delete/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    responses((status = 303, description = "Back to /departments", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn delete_department(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> AppResult<FlashRedirect> {
    let result = state.departments.delete_department(&actor, id).await;

    FlashRedirect::settle(DEPARTMENTS_PAGE, result, DEPARTMENT_NOT_FOUND, |_| {
        FlashRedirect::success(DEPARTMENTS_PAGE, "Department deleted")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::flash::FlashCategory;
    use crate::api::handlers::test_support::{actor, Mocks};
    use crate::domain::{Outcome, UserRole};
    use crate::services::DEPARTMENT_EXISTS;

    #[tokio::test]
    async fn test_duplicate_name_is_informational() {
        let mut mocks = Mocks::new();
        mocks
            .departments
            .expect_create_department()
            .returning(|_, _| Ok(Outcome::declined(DEPARTMENT_EXISTS)));

        let redirect = create_department(
            State(mocks.into_state()),
            Extension(actor(1, UserRole::Admin)),
            FlashForm(DepartmentForm {
                name: "Engineering".into(),
            }),
        )
        .await
        .unwrap();

        let flash = redirect.flash.unwrap();
        assert_eq!(flash.category, FlashCategory::Info);
        assert_eq!(flash.message, DEPARTMENT_EXISTS);
    }

    #[tokio::test]
    async fn test_created_department_named_in_flash() {
        let mut mocks = Mocks::new();
        mocks
            .departments
            .expect_create_department()
            .returning(|_, name| Ok(Outcome::Applied(Department { id: 3, name })));

        let redirect = create_department(
            State(mocks.into_state()),
            Extension(actor(1, UserRole::Admin)),
            FlashForm(DepartmentForm {
                name: "Finance".into(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(
            redirect,
            FlashRedirect::success(DEPARTMENTS_PAGE, "Department Finance created")
        );
    }
}
