//! Principal store

use crate::domain::Principal;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Lookup of principals by their identifier (email).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// `Ok(None)` when no principal has this identifier.
    async fn find_by_principal_id(&self, principal_id: &str) -> Result<Option<Principal>>;

    /// Fails with `Conflict` when the email is already taken.
    async fn create(&self, principal: Principal) -> Result<Principal>;
}

/// Process-local store keyed by email
pub struct InMemoryPrincipalStore {
    principals: RwLock<HashMap<String, Principal>>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self {
            principals: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPrincipalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipalStore {
    async fn find_by_principal_id(&self, principal_id: &str) -> Result<Option<Principal>> {
        Ok(self.principals.read().await.get(principal_id).cloned())
    }

    async fn create(&self, principal: Principal) -> Result<Principal> {
        let mut principals = self.principals.write().await;
        if principals.contains_key(&principal.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        principals.insert(principal.email.clone(), principal.clone());
        Ok(principal)
    }
}
