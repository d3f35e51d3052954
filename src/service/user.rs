//! User registration and lookup

use crate::config::SeedUser;
use crate::crypto::PasswordHasher;
use crate::domain::{Principal, RegisterInput};
use crate::error::{AppError, Result};
use crate::repository::PrincipalStore;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

pub struct UserService<P: PrincipalStore, H: PasswordHasher> {
    store: Arc<P>,
    hasher: Arc<H>,
}

impl<P: PrincipalStore, H: PasswordHasher> UserService<P, H> {
    pub fn new(store: Arc<P>, hasher: Arc<H>) -> Self {
        Self { store, hasher }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<Principal> {
        input.validate()?;

        if self
            .store
            .find_by_principal_id(&input.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let secret_hash = self.hasher.hash(&input.password)?;
        let principal = self
            .store
            .create(Principal::new(input.name, input.email, secret_hash))
            .await?;

        info!(principal_id = %principal.email, "Registered user");
        Ok(principal)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Principal> {
        self.store
            .find_by_principal_id(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Create the configured startup users. Existing emails are skipped.
    pub async fn seed(&self, users: &[SeedUser]) -> Result<usize> {
        let mut created = 0;
        for user in users {
            let secret_hash = self.hasher.hash(&user.password)?;
            let principal = Principal::new(user.name.clone(), user.email.clone(), secret_hash);
            match self.store.create(principal).await {
                Ok(_) => created += 1,
                Err(AppError::Conflict(_)) => {
                    warn!(principal_id = %user.email, "Seed user already exists, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }
}
