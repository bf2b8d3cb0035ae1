//! Registration, login and logout handlers.

use axum::{extract::State, http::HeaderMap, routing::{get, post}, Extension, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{FlashForm, FormPage, ValidatedForm};
use crate::api::flash::{FlashRedirect, RedirectBody};
use crate::api::middleware::{resolve_actor, session_cookie};
use crate::api::AppState;
use crate::config::{DASHBOARD_PAGE, LOGIN_PAGE, REGISTER_PAGE};
use crate::domain::Actor;
use crate::errors::{AppError, AppResult};

/// Self-service registration form
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(max = 150, message = "Username is too long"))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

impl FormPage for RegisterForm {
    const PAGE: &'static str = REGISTER_PAGE;
}

/// Login form
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    #[schema(example = "jdoe")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl FormPage for LoginForm {
    const PAGE: &'static str = LOGIN_PAGE;
}

/// Routes reachable without a session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes that need a session
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/logout", post(logout))
}

/// Landing page: the dashboard when logged in, otherwise the login page
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> AppResult<FlashRedirect> {
    let target = match resolve_actor(&state, &jar, &headers).await? {
        Some(_) => DASHBOARD_PAGE,
        None => LOGIN_PAGE,
    };
    Ok(FlashRedirect::to(target))
}

/// Register a new account with the User role
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "To /login on success, back to /register otherwise", body = RedirectBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<RegisterForm>,
) -> AppResult<FlashRedirect> {
    match state.identity.register(form.username, form.password).await {
        Ok(_) => Ok(FlashRedirect::success(
            LOGIN_PAGE,
            "Registration successful. Please log in.",
        )),
        Err(AppError::Validation(message)) => Ok(FlashRedirect::danger(REGISTER_PAGE, message)),
        Err(e) => Err(e),
    }
}

/// Log in and receive the session cookie
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "To /dashboard with a session cookie, or back to /login", body = RedirectBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    FlashForm(form): FlashForm<LoginForm>,
) -> AppResult<(CookieJar, FlashRedirect)> {
    match state.identity.login(form.username, form.password).await {
        Ok(session) => {
            tracing::info!(user_id = session.user.id, "User logged in");
            let welcome = format!("Welcome, {}!", session.user.username);
            Ok((
                jar.add(session_cookie(session.token.access_token)),
                FlashRedirect::success(DASHBOARD_PAGE, welcome),
            ))
        }
        Err(e @ AppError::InvalidCredentials) => {
            Ok((jar, FlashRedirect::danger(LOGIN_PAGE, e.to_string())))
        }
        Err(e) => Err(e),
    }
}

/// End the session
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Authentication",
    responses(
        (status = 303, description = "To /login, session cookie removed", body = RedirectBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    jar: CookieJar,
) -> AppResult<(CookieJar, FlashRedirect)> {
    state.identity.logout(&actor).await?;

    Ok((
        jar.remove(session_cookie("")),
        FlashRedirect::info(LOGIN_PAGE, "You have been logged out."),
    ))
}
