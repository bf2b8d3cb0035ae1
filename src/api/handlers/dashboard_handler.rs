//! Dashboard handler.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::AppState;
use crate::domain::{Actor, Dashboard};
use crate::errors::AppResult;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Assets awaiting approval and overall counters
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Pending assets in the caller's scope plus counters", body = Dashboard),
        (status = 303, description = "Not logged in")
    ),
    security(("session_cookie" = []))
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<Dashboard>> {
    Ok(Json(state.assets.dashboard(&actor).await?))
}
