//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Strict parse; `None` for anything but the two stored role names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            ROLE_ADMIN => Some(UserRole::Admin),
            ROLE_USER => Some(UserRole::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::User => ROLE_USER,
        }
    }
}

/// Lenient conversion used for stored values: unknown strings fall back to User.
impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or(UserRole::User)
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Admin-submitted account to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    /// Requested role name; `None` means `User`.
    pub role: Option<String>,
}

/// Submitted edit of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEdit {
    pub username: String,
    /// New password, or the unchanged placeholder.
    pub password: String,
    /// Requested role name; `None` keeps the current role.
    pub role: Option<String>,
}

/// Changes applied by an accepted user edit.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "jdoe")]
    pub username: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strict_parse() {
        assert_eq!(UserRole::parse("Admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("User"), Some(UserRole::User));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::parse("root"), None);
    }

    #[test]
    fn test_role_lenient_conversion() {
        assert_eq!(UserRole::from("Admin"), UserRole::Admin);
        assert_eq!(UserRole::from("garbage"), UserRole::User);
    }

    #[test]
    fn test_role_display_matches_stored_value() {
        assert_eq!(UserRole::Admin.to_string(), "Admin");
        assert_eq!(String::from(UserRole::User), "User");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 3,
            username: "jdoe".into(),
            password_hash: "$argon2id$secret".into(),
            role: UserRole::User,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
    }
}
