//! Password credential: Argon2 hashing and verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// Hash that never verifies; checked against when the username is unknown
/// so that a failed login costs the same either way.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$ZHVtbXloYXNoMTIzNDU2Nzg5MDEyMzQ1Njc4OTAxMg";

/// A stored password hash in PHC string form.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl Password {
    /// Hash a submitted password with a fresh salt.
    ///
    /// Any non-empty value is accepted.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// A malformed stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Unparseable password hash: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_only_the_original() {
        let password = Password::new("correct horse").unwrap();

        assert!(password.verify("correct horse"));
        assert!(!password.verify("Correct horse"));
        assert!(!password.verify(""));
    }

    #[test]
    fn test_stored_hash_round_trips() {
        let stored = Password::new("pw").unwrap().into_string();
        assert!(stored.starts_with("$argon2"));

        assert!(Password::from_hash(stored).verify("pw"));
    }

    #[test]
    fn test_salts_differ() {
        let first = Password::new("same").unwrap().into_string();
        let second = Password::new("same").unwrap().into_string();

        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(Password::new(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_garbage_and_dummy_hashes_never_verify() {
        assert!(!Password::from_hash("not-a-hash".into()).verify("not-a-hash"));

        let dummy = Password::from_hash(DUMMY_HASH.to_string());
        assert!(!dummy.verify(""));
        assert!(!dummy.verify("password"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::new("hunter2").unwrap();
        assert_eq!(format!("{:?}", password), "Password([REDACTED])");
    }
}
