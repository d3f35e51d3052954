//! Login credential

use serde::Deserialize;
use std::fmt;
use validator::Validate;

/// Email + password pair submitted at login. Never persisted.
#[derive(Clone, Deserialize, Validate)]
pub struct Credential {
    #[validate(email)]
    #[serde(alias = "principal_id")]
    pub email: String,
    #[validate(length(min = 1))]
    #[serde(alias = "senha")]
    pub password: String,
}

/// Authentication request handed to the credential verifier.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AuthenticationRequest<'a> {
    pub principal_id: &'a str,
    pub secret: &'a str,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn to_authentication_request(&self) -> AuthenticationRequest<'_> {
        AuthenticationRequest {
            principal_id: &self.email,
            secret: &self.password,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for AuthenticationRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationRequest")
            .field("principal_id", &self.principal_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
