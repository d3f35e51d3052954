//! Password hashing (Argon2id, PHC string format)

use crate::error::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash,
};

/// Well-formed Argon2id hash (default cost parameters) that no password
/// matches. Verified against when the principal is unknown so the miss path
/// costs the same as a wrong password.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Produces a storable hash from a plaintext secret.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, secret: &str) -> Result<String>;
}

/// Checks a plaintext secret against a stored hash.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordVerifier: Send + Sync {
    /// `Ok(false)` on mismatch. A hash that cannot be parsed is an error.
    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, secret: &str) -> Result<String> {
        use argon2::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

impl PasswordVerifier for Argon2PasswordHasher {
    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool> {
        use argon2::PasswordVerifier as _;

        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
