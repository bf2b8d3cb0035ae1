//! Shared fixtures: real services over a migrated in-memory SQLite database.

#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::ConnectOptions;

use asset_tracker::config::Config;
use asset_tracker::domain::{Actor, Asset, AssetDraft, AssetFields, Department, LogEntry, Password, UserRole};
use asset_tracker::infra::{AssetStore, Database, DepartmentStore, LogStore, UserStore};
use asset_tracker::services::Services;
use asset_tracker::AppState;

pub const PASSWORD: &str = "password";
pub const SESSION_SECRET: &str = "integration-test-secret-of-32-chars!";

pub struct Harness {
    pub db: Database,
    pub config: Config,
    pub services: Services,
}

impl Harness {
    pub async fn new() -> Self {
        // One connection: every pooled connection would get its own empty database
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect_with(options)
            .await
            .expect("in-memory database");
        db.run_migrations().await.expect("migrations");

        let config = Config::builder("sqlite::memory:", SESSION_SECRET).expect("config");
        let services = Services::from_connection(db.get_connection(), config.clone());

        Self {
            db,
            config,
            services,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::from_config(Arc::new(self.db.clone()), self.config.clone())
    }

    pub async fn user(&self, username: &str, role: UserRole) -> Actor {
        let hash = Password::new(PASSWORD).expect("hash").into_string();
        let user = UserStore::new(self.db.connection())
            .insert(username.to_string(), hash, role)
            .await
            .expect("seed user");
        Actor::from(user)
    }

    pub async fn admin(&self) -> Actor {
        self.user("admin", UserRole::Admin).await
    }

    pub async fn department(&self, name: &str) -> Department {
        DepartmentStore::new(self.db.connection())
            .insert(name.to_string())
            .await
            .expect("seed department")
    }

    pub async fn asset(&self, name: &str, owner: Option<i32>, department: Option<i32>) -> Asset {
        AssetStore::new(self.db.connection())
            .insert(fields(name, owner, department))
            .await
            .expect("seed asset")
    }

    pub async fn find_asset(&self, id: i32) -> Option<Asset> {
        AssetStore::new(self.db.connection())
            .find_by_id(id)
            .await
            .expect("asset lookup")
    }

    pub async fn stored_role(&self, id: i32) -> Option<UserRole> {
        UserStore::new(self.db.connection())
            .find_by_id(id)
            .await
            .expect("user lookup")
            .map(|u| u.role)
    }

    pub async fn stored_hash(&self, id: i32) -> String {
        UserStore::new(self.db.connection())
            .find_by_id(id)
            .await
            .expect("user lookup")
            .expect("user exists")
            .password_hash
    }

    /// Audit entries, newest first.
    pub async fn logs(&self) -> Vec<LogEntry> {
        LogStore::new(self.db.connection())
            .list()
            .await
            .expect("log listing")
    }

    pub async fn log_count(&self) -> u64 {
        LogStore::new(self.db.connection())
            .count()
            .await
            .expect("log count")
    }
}

pub fn fields(name: &str, owner: Option<i32>, department: Option<i32>) -> AssetFields {
    AssetFields {
        name: name.to_string(),
        description: None,
        asset_type: Some("Laptop".to_string()),
        serial_number: None,
        in_use: true,
        approved: false,
        owner_id: owner,
        department_id: department,
    }
}

/// The same fields as a form would submit them.
pub fn draft(name: &str, owner: Option<i32>, department: Option<i32>) -> AssetDraft {
    fields(name, owner, department).into()
}
