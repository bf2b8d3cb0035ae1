//! User management handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::extractors::{empty_string_as_none, FlashForm, FormPage};
use crate::api::flash::{FlashRedirect, RedirectBody};
use crate::api::middleware::session_cookie;
use crate::api::AppState;
use crate::config::{LOGIN_PAGE, USERS_PAGE};
use crate::domain::{Actor, NewUser, UserEdit, UserResponse};
use crate::errors::AppResult;

const USER_NOT_FOUND: &str = "User not found";

/// Account create/edit form
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserForm {
    #[serde(default)]
    #[schema(example = "jdoe")]
    pub username: String,
    /// New password; "[HIDDEN]" on an edit keeps the current one
    #[serde(default)]
    #[schema(example = "[HIDDEN]")]
    pub password: String,
    /// "User" or "Admin"; only an Admin's choice is honoured
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(example = "User")]
    pub role: Option<String>,
}

impl FormPage for UserForm {
    const PAGE: &'static str = USERS_PAGE;
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/user/create", post(create_user))
        .route("/user/edit/:id", post(edit_user))
        .route("/user/delete/:id", post(delete_user))
        .route("/user/promote/:id", post(promote_user))
}

/// List users: everyone for an Admin, otherwise just the caller
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Visible accounts", body = Vec<UserResponse>),
        (status = 303, description = "Not logged in")
    ),
    security(("session_cookie" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.users.list_users(&actor).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create an account (Admin only)
#[utoipa::path(
    post,
    path = "/user/create",
    tag = "Users",
    request_body(content = UserForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Back to /users", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    FlashForm(form): FlashForm<UserForm>,
) -> AppResult<FlashRedirect> {
    let new_user = NewUser {
        username: form.username,
        password: form.password,
        role: form.role,
    };
    let result = state.users.create_user(&actor, new_user).await;

    FlashRedirect::settle(USERS_PAGE, result, USER_NOT_FOUND, |outcome| {
        FlashRedirect::outcome(USERS_PAGE, outcome, |u| format!("User {} created", u.username))
    })
}

/// Edit an account: the caller's own, or any for an Admin
#[utoipa::path(
    post,
    path = "/user/edit/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    request_body(content = UserForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 303, description = "Back to /users", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn edit_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
    FlashForm(form): FlashForm<UserForm>,
) -> AppResult<FlashRedirect> {
    let edit = UserEdit {
        username: form.username,
        password: form.password,
        role: form.role,
    };
    let result = state.users.edit_user(&actor, id, edit).await;

    FlashRedirect::settle(USERS_PAGE, result, USER_NOT_FOUND, |outcome| {
        FlashRedirect::outcome(USERS_PAGE, outcome, |u| format!("User {} updated", u.username))
    })
}

/// Delete an account and its assets
///
/// Deleting your own account also ends the session.
#[utoipa::path(
    post,
    path = "/user/delete/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses((status = 303, description = "Back to /users, or to /login after self-deletion", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    match state.users.delete_user(&actor, id).await {
        Ok(removal) if removal.self_deleted => Ok((
            jar.remove(session_cookie("")),
            FlashRedirect::info(LOGIN_PAGE, "User deleted"),
        )
            .into_response()),
        result => FlashRedirect::settle(USERS_PAGE, result, USER_NOT_FOUND, |_| {
            FlashRedirect::info(USERS_PAGE, "User deleted")
        })
        .map(IntoResponse::into_response),
    }
}

/// Give an account the Admin role (Admin only)
#[utoipa::path(
    post,
    path = "/user/promote/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses((status = 303, description = "Back to /users", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn promote_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> AppResult<FlashRedirect> {
    let result = state.users.promote_user(&actor, id).await;

    FlashRedirect::settle(USERS_PAGE, result, USER_NOT_FOUND, |_| {
        FlashRedirect::success(USERS_PAGE, "User promoted to Admin")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::flash::FlashCategory;
    use crate::api::handlers::test_support::{actor, Mocks};
    use crate::config::SESSION_COOKIE;
    use crate::domain::{Outcome, User, UserRole};
    use crate::services::{UserRemoval, SELF_DEMOTION};
    use axum::http::{header, StatusCode};

    fn user(id: i32) -> User {
        User {
            id,
            username: format!("user{}", id),
            password_hash: String::new(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_self_demotion_is_informational() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_edit_user()
            .returning(|_, _, _| Ok(Outcome::declined(SELF_DEMOTION)));

        let redirect = edit_user(
            State(mocks.into_state()),
            Extension(actor(1, UserRole::Admin)),
            Path(1),
            FlashForm(UserForm {
                username: "user1".into(),
                password: "[HIDDEN]".into(),
                role: Some("User".into()),
            }),
        )
        .await
        .unwrap();

        let flash = redirect.flash.unwrap();
        assert_eq!(flash.category, FlashCategory::Info);
        assert_eq!(flash.message, "You cannot demote yourself to User");
    }

    #[tokio::test]
    async fn test_self_deletion_ends_session() {
        let mut mocks = Mocks::new();
        mocks.users.expect_delete_user().returning(|_, id| {
            Ok(UserRemoval {
                user: user(id),
                self_deleted: true,
            })
        });

        let response = delete_user(
            State(mocks.into_state()),
            Extension(actor(5, UserRole::User)),
            CookieJar::new(),
            Path(5),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], LOGIN_PAGE);
        let cleared = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .any(|v| v.to_str().unwrap_or("").starts_with(SESSION_COOKIE));
        assert!(cleared);
    }

    #[tokio::test]
    async fn test_deleting_someone_else_stays_on_users() {
        let mut mocks = Mocks::new();
        mocks.users.expect_delete_user().returning(|_, id| {
            Ok(UserRemoval {
                user: user(id),
                self_deleted: false,
            })
        });

        let response = delete_user(
            State(mocks.into_state()),
            Extension(actor(1, UserRole::Admin)),
            CookieJar::new(),
            Path(5),
        )
        .await
        .unwrap();

        assert_eq!(response.headers()[header::LOCATION], USERS_PAGE);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
