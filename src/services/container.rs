//! Service Container - Centralized service access.
//!
//! Every service shares one [`Persistence`] unit of work over the same
//! connection pool.

use std::sync::Arc;

use super::{
    AssetRegistry, AssetService, AuditService, AuditTrail, DepartmentRegistry, DepartmentService,
    IdentityManager, IdentityService, UserRegistry, UserService,
};
use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn identity(&self) -> Arc<dyn IdentityService>;

    fn assets(&self) -> Arc<dyn AssetService>;

    fn departments(&self) -> Arc<dyn DepartmentService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn audit(&self) -> Arc<dyn AuditService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    identity: Arc<dyn IdentityService>,
    assets: Arc<dyn AssetService>,
    departments: Arc<dyn DepartmentService>,
    users: Arc<dyn UserService>,
    audit: Arc<dyn AuditService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow: Arc<dyn UnitOfWork> = Arc::new(Persistence::new(db));

        Self {
            identity: Arc::new(IdentityManager::new(uow.clone(), config)),
            assets: Arc::new(AssetRegistry::new(uow.clone())),
            departments: Arc::new(DepartmentRegistry::new(uow.clone())),
            users: Arc::new(UserRegistry::new(uow.clone())),
            audit: Arc::new(AuditTrail::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn identity(&self) -> Arc<dyn IdentityService> {
        self.identity.clone()
    }

    fn assets(&self) -> Arc<dyn AssetService> {
        self.assets.clone()
    }

    fn departments(&self) -> Arc<dyn DepartmentService> {
        self.departments.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn audit(&self) -> Arc<dyn AuditService> {
        self.audit.clone()
    }
}
