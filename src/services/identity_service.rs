//! Identity service - Registration, login and session resolution.
//!
//! Sessions are HS256 tokens. They carry the user id, username and role
//! together, but only the id is trusted: every request re-reads the
//! account, so a deleted user resolves to no one and a promotion
//! applies immediately.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::checks;
use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER, USERNAME_MAX_LENGTH};
use crate::domain::{password::DUMMY_HASH, Actor, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{UnitOfWork, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub const CREDENTIALS_REQUIRED: &str = "Username and password are required.";
pub const USERNAME_TAKEN: &str = "Username is already taken.";

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i32,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issued session token
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionToken {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct SignedSession {
    pub user: User,
    pub token: SessionToken,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Self-service sign-up. Always creates a `User`.
    async fn register(&self, username: String, password: String) -> AppResult<User>;

    async fn login(&self, username: String, password: String) -> AppResult<SignedSession>;

    async fn logout(&self, actor: &Actor) -> AppResult<()>;

    /// Resolve a session token to its account, if both are still valid.
    async fn current_user(&self, token: &str) -> AppResult<Option<Actor>>;

    /// Create an Admin account outside the access policy.
    async fn bootstrap_admin(&self, username: String, password: String) -> AppResult<User>;

    fn verify_token(&self, token: &str) -> AppResult<SessionClaims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<SessionToken> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.session_expiration_hours);

    let claims = SessionClaims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret_bytes()),
    )?;

    Ok(SessionToken {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.session_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<SessionClaims> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.session_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn credentials(username: String, password: &str) -> AppResult<String> {
    let username = username.trim().to_string();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::validation(CREDENTIALS_REQUIRED));
    }
    checks::bounded(&username, USERNAME_MAX_LENGTH, "Username is too long")?;
    Ok(username)
}

pub struct IdentityManager {
    uow: Arc<dyn UnitOfWork>,
    config: Config,
}

impl IdentityManager {
    pub fn new(uow: Arc<dyn UnitOfWork>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn create_account(
        &self,
        username: String,
        password: String,
        role: UserRole,
    ) -> AppResult<User> {
        let username = credentials(username, &password)?;
        let tx = self.uow.begin().await?;

        if tx.users().find_by_username(&username).await?.is_some() {
            return Err(AppError::validation(USERNAME_TAKEN));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = match tx.users().insert(username, password_hash, role).await {
            Ok(user) => user,
            Err(AppError::Conflict(_)) => return Err(AppError::validation(USERNAME_TAKEN)),
            Err(e) => return Err(e),
        };

        let actor = Actor::from(&user);
        let message = match role {
            UserRole::Admin => format!("Admin account {} bootstrapped", actor),
            UserRole::User => format!("Registered account as {}", actor),
        };
        tx.audit().record(user.id, message).await?;
        tx.commit().await?;

        Ok(user)
    }
}

#[async_trait]
impl IdentityService for IdentityManager {
    async fn register(&self, username: String, password: String) -> AppResult<User> {
        self.create_account(username, password, UserRole::User).await
    }

    async fn login(&self, username: String, password: String) -> AppResult<SignedSession> {
        let tx = self.uow.begin().await?;
        let user = tx.users().find_by_username(username.trim()).await?;

        // Verify against a dummy hash for unknown usernames so both
        // failures take the same time.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::from_hash(DUMMY_HASH.to_string()),
        };
        let password_valid = stored.verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        let token = generate_token(&user, &self.config)?;
        tx.audit()
            .record(user.id, format!("Logged in as {}", Actor::from(&user)))
            .await?;
        tx.commit().await?;

        Ok(SignedSession { user, token })
    }

    async fn logout(&self, actor: &Actor) -> AppResult<()> {
        let tx = self.uow.begin().await?;
        tx.audit()
            .record(actor.id, format!("Logged out as {}", actor))
            .await?;
        tx.commit().await
    }

    async fn current_user(&self, token: &str) -> AppResult<Option<Actor>> {
        let claims = match verify_token_internal(token, &self.config) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                return Ok(None);
            }
        };

        let user = UserStore::new(self.uow.connection())
            .find_by_id(claims.sub)
            .await?;
        Ok(user.map(Actor::from))
    }

    async fn bootstrap_admin(&self, username: String, password: String) -> AppResult<User> {
        self.create_account(username, password, UserRole::Admin).await
    }

    fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        verify_token_internal(token, &self.config)
    }
}
