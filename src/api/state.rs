//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AssetService, AuditService, DepartmentService, IdentityService, ServiceContainer, Services,
    UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityService>,
    pub assets: Arc<dyn AssetService>,
    pub departments: Arc<dyn DepartmentService>,
    pub users: Arc<dyn UserService>,
    pub audit: Arc<dyn AuditService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::new(&container, database)
    }

    /// Create application state from any service container.
    ///
    /// Handler tests pass a container of mocks here.
    pub fn new(services: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            identity: services.identity(),
            assets: services.assets(),
            departments: services.departments(),
            users: services.users(),
            audit: services.audit(),
            database,
        }
    }
}
