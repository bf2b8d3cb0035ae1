//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::flash::{Flash, FlashCategory, RedirectBody};
use crate::api::handlers::{
    asset_handler, auth_handler, dashboard_handler, department_handler, log_handler, user_handler,
};
use crate::config::SESSION_COOKIE;
use crate::domain::{Asset, AssetView, Dashboard, Department, LogEntry, Metrics, UserResponse, UserRole};

/// OpenAPI documentation for the asset tracker
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Asset Tracker",
        version = "0.1.0",
        description = "IT asset tracking with role-gated management and an audit trail"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        // Dashboard
        dashboard_handler::dashboard,
        // Asset endpoints
        asset_handler::list_assets,
        asset_handler::create_asset,
        asset_handler::edit_asset,
        asset_handler::delete_asset,
        asset_handler::approve_asset,
        // Department endpoints
        department_handler::list_departments,
        department_handler::create_department,
        department_handler::edit_department,
        department_handler::delete_department,
        // User endpoints
        user_handler::list_users,
        user_handler::create_user,
        user_handler::edit_user,
        user_handler::delete_user,
        user_handler::promote_user,
        // Log endpoints
        log_handler::list_logs,
        log_handler::delete_log,
    ),
    components(
        schemas(
            // Domain types
            Asset,
            AssetView,
            Dashboard,
            Metrics,
            Department,
            LogEntry,
            UserRole,
            UserResponse,
            // Redirect types
            Flash,
            FlashCategory,
            RedirectBody,
            // Forms
            auth_handler::RegisterForm,
            auth_handler::LoginForm,
            asset_handler::AssetForm,
            department_handler::DepartmentForm,
            user_handler::UserForm,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and logout"),
        (name = "Dashboard", description = "Pending approvals and counters"),
        (name = "Assets", description = "Asset registry and approval"),
        (name = "Departments", description = "Department management"),
        (name = "Users", description = "Account management"),
        (name = "Logs", description = "Audit trail")
    )
)]
pub struct ApiDoc;

/// Session cookie plus Bearer fallback
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE,
                    "Session token issued by /login",
                ))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("The same session token as a Bearer header"))
                        .build(),
                ),
            );
        }
    }
}
