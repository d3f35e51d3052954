//! Principal (user) domain model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// The single role every principal holds.
pub const DEFAULT_ROLE: &str = "ROLE_USUARIO";

/// A registered user, keyed by email.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub secret_hash: String,
    pub roles: BTreeSet<String>,
}

impl Principal {
    pub fn new(name: impl Into<String>, email: impl Into<String>, secret_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            secret_hash,
            roles: BTreeSet::from([DEFAULT_ROLE.to_string()]),
        }
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Public view of a principal (API responses never carry the hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<&Principal> for PrincipalView {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id,
            name: principal.name.clone(),
            email: principal.email.clone(),
            roles: principal.roles.iter().cloned().collect(),
        }
    }
}

/// Input for registering a new principal
#[derive(Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_password_confirmation"))]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 40))]
    #[serde(alias = "nome")]
    pub name: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(min = 8))]
    #[serde(alias = "senha")]
    pub password: String,
    #[serde(default, alias = "confirmarSenha")]
    pub confirm_password: Option<String>,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn validate_password_confirmation(input: &RegisterInput) -> Result<(), ValidationError> {
    match &input.confirm_password {
        Some(confirmation) if confirmation != &input.password => {
            Err(ValidationError::new("password_mismatch"))
        }
        _ => Ok(()),
    }
}
