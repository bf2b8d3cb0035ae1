//! Domain layer - Core business entities and rules
//!
//! Entities, the password credential, the request-scoped [`Actor`] and
//! the access policy. Nothing here touches storage or HTTP.

pub mod actor;
pub mod asset;
pub mod department;
pub mod log_entry;
pub mod outcome;
pub mod password;
pub mod policy;
pub mod user;

pub use actor::Actor;
pub use asset::{Asset, AssetDraft, AssetFields, AssetView, Dashboard, Metrics};
pub use department::Department;
pub use log_entry::LogEntry;
pub use outcome::Outcome;
pub use password::Password;
pub use policy::{AccessPolicy, Action, Decision, Denial, DenialReason, Scope};
pub use user::{NewUser, User, UserChanges, UserEdit, UserResponse, UserRole};
