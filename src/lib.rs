//! Asset Tracker - Internal IT asset registry
//!
//! Users, departments and assets behind a two-role access policy, with
//! every change and every refused attempt written to an audit trail in
//! the same transaction.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, the request-scoped actor and the access policy
//! - **services**: Registries for assets, departments, users and the audit trail
//! - **infra**: Database, migrations, stores and the unit of work
//! - **api**: HTTP handlers, session middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the first Admin
//! cargo run -- create-admin --username admin --password change-me
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{AccessPolicy, Actor, Outcome, Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Database;
