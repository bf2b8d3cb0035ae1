//! Repository layer - Data access abstraction
//!
//! One store per entity. Each borrows a sea-orm connection, which is
//! either the shared pool or the transaction of a unit of work.

mod asset_store;
mod department_store;
pub(crate) mod entities;
mod log_store;
mod user_store;

pub use asset_store::{AssetFilter, AssetStore};
pub use department_store::DepartmentStore;
pub use log_store::LogStore;
pub use user_store::UserStore;
