//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod asset;
pub mod department;
pub mod log;
pub mod user;
