//! Per-request security context

use super::principal::Principal;
use serde::{Deserialize, Serialize};

/// Authenticated identity attached to a single request.
///
/// Lives in the request's extensions and is dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    pub principal_id: String,
    pub roles: Vec<String>,
}

impl From<&Principal> for SecurityContext {
    fn from(principal: &Principal) -> Self {
        Self {
            principal_id: principal.email.clone(),
            roles: principal.roles.iter().cloned().collect(),
        }
    }
}
