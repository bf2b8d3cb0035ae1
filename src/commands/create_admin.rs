//! Create-admin command - Bootstraps the first Admin account.
//!
//! A fresh database has no Admin, and only an Admin can promote anyone.

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{IdentityService, Services, ServiceContainer};

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), config);

    let admin = services
        .identity()
        .bootstrap_admin(args.username, args.password)
        .await?;

    tracing::info!(user_id = admin.id, "Admin account created");
    println!("Created Admin {} (ID: {})", admin.username, admin.id);

    Ok(())
}
