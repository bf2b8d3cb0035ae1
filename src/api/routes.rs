//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::flash::FlashRedirect;
use super::handlers::{
    asset_routes, dashboard_routes, department_routes, log_routes, public_routes, session_routes,
    user_routes,
};
use super::middleware::require_login;
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::ROOT_PAGE;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(session_routes())
        .merge(dashboard_routes())
        .merge(asset_routes())
        .merge(department_routes())
        .merge(user_routes())
        .merge(log_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes())
        .merge(protected)
        .fallback(unknown_route)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Unknown paths go back to the root
async fn unknown_route() -> FlashRedirect {
    FlashRedirect::to(ROOT_PAGE)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Liveness plus a database round trip
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "up",
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: "down",
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
