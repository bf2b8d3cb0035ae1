//! Application services layer - Use cases and business logic.
//!
//! Each service takes the request's [`Actor`](crate::domain::Actor)
//! explicitly, opens one unit of work, consults the access policy and
//! writes the audit entry in the same transaction as the change.

mod asset_service;
mod audit_service;
mod checks;
pub mod container;
mod department_service;
mod identity_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use asset_service::{AssetRegistry, AssetService};
pub use audit_service::{AuditService, AuditTrail};
pub use department_service::{DepartmentRegistry, DepartmentService, DEPARTMENT_EXISTS};
pub use identity_service::{
    IdentityManager, IdentityService, SessionClaims, SessionToken, SignedSession,
    CREDENTIALS_REQUIRED, USERNAME_TAKEN,
};
pub use user_service::{UserRegistry, UserRemoval, UserService, SELF_DEMOTION, USER_EXISTS};

#[cfg(any(test, feature = "test-utils"))]
pub use asset_service::MockAssetService;
#[cfg(any(test, feature = "test-utils"))]
pub use audit_service::MockAuditService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use department_service::MockDepartmentService;
#[cfg(any(test, feature = "test-utils"))]
pub use identity_service::MockIdentityService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
