//! Audit log handlers (Admin only).

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};

use crate::api::flash::{FlashRedirect, RedirectBody};
use crate::api::AppState;
use crate::config::{DASHBOARD_PAGE, LOGS_PAGE};
use crate::domain::{Actor, LogEntry};
use crate::errors::{AppError, AppResult};

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/logs", get(list_logs))
        .route("/log/delete/:id", post(delete_log))
}

/// The audit trail, newest first
///
/// Non-admins are sent back to the dashboard; the attempt is logged.
#[utoipa::path(
    get,
    path = "/logs",
    tag = "Logs",
    responses(
        (status = 200, description = "Every entry, newest first", body = Vec<LogEntry>),
        (status = 303, description = "Not an Admin, or not logged in", body = RedirectBody)
    ),
    security(("session_cookie" = []))
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Response> {
    match state.audit.list_logs(&actor).await {
        Ok(entries) => Ok(Json(entries).into_response()),
        Err(e @ AppError::Forbidden) => {
            Ok(FlashRedirect::danger(DASHBOARD_PAGE, e.to_string()).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Delete one audit entry
#[utoipa::path(
    post,
    path = "/log/delete/{id}",
    tag = "Logs",
    params(("id" = i32, Path, description = "Log entry ID")),
    responses((status = 303, description = "Back to /logs", body = RedirectBody)),
    security(("session_cookie" = []))
)]
pub async fn delete_log(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i32>,
) -> AppResult<FlashRedirect> {
    let result = state.audit.delete_log(&actor, id).await;

    FlashRedirect::settle(LOGS_PAGE, result, "Log not found", |_| {
        FlashRedirect::info(LOGS_PAGE, "Log deleted")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::{actor, Mocks};
    use crate::domain::UserRole;
    use axum::http::{header, StatusCode};

    #[tokio::test]
    async fn test_non_admin_redirected_to_dashboard() {
        let mut mocks = Mocks::new();
        mocks
            .audit
            .expect_list_logs()
            .times(1)
            .returning(|_| Err(AppError::Forbidden));

        let response = list_logs(State(mocks.into_state()), Extension(actor(2, UserRole::User)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], DASHBOARD_PAGE);
    }

    #[tokio::test]
    async fn test_admin_gets_entries() {
        let mut mocks = Mocks::new();
        mocks.audit.expect_list_logs().returning(|_| Ok(Vec::new()));

        let response = list_logs(State(mocks.into_state()), Extension(actor(1, UserRole::Admin)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
