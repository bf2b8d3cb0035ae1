//! HTTP request handlers.

pub mod asset_handler;
pub mod auth_handler;
pub mod dashboard_handler;
pub mod department_handler;
pub mod log_handler;
pub mod user_handler;

pub use asset_handler::asset_routes;
pub use auth_handler::{public_routes, session_routes};
pub use dashboard_handler::dashboard_routes;
pub use department_handler::department_routes;
pub use log_handler::log_routes;
pub use user_handler::user_routes;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use sea_orm::DatabaseConnection;

    use crate::api::AppState;
    use crate::domain::{Actor, UserRole};
    use crate::infra::Database;
    use crate::services::{
        MockAssetService, MockAuditService, MockDepartmentService, MockIdentityService,
        MockUserService,
    };

    pub fn actor(id: i32, role: UserRole) -> Actor {
        Actor {
            id,
            username: format!("user{}", id),
            role,
        }
    }

    /// One mock per service; set expectations, then build the state.
    pub struct Mocks {
        pub identity: MockIdentityService,
        pub assets: MockAssetService,
        pub departments: MockDepartmentService,
        pub users: MockUserService,
        pub audit: MockAuditService,
    }

    impl Mocks {
        pub fn new() -> Self {
            Self {
                identity: MockIdentityService::new(),
                assets: MockAssetService::new(),
                departments: MockDepartmentService::new(),
                users: MockUserService::new(),
                audit: MockAuditService::new(),
            }
        }

        pub fn into_state(self) -> AppState {
            AppState {
                identity: Arc::new(self.identity),
                assets: Arc::new(self.assets),
                departments: Arc::new(self.departments),
                users: Arc::new(self.users),
                audit: Arc::new(self.audit),
                database: Arc::new(Database::from_connection(DatabaseConnection::default())),
            }
        }
    }
}
