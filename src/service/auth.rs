//! Credential authentication and token issuance

use crate::crypto::{PasswordVerifier, DUMMY_PASSWORD_HASH};
use crate::domain::{AuthenticationRequest, Credential, Principal, Token};
use crate::error::{AppError, Result};
use crate::jwt::TokenCodec;
use crate::repository::PrincipalStore;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Message returned for every failed login, whatever the cause.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthenticationService<P: PrincipalStore, V: PasswordVerifier> {
    store: Arc<P>,
    verifier: Arc<V>,
    tokens: TokenCodec,
}

impl<P: PrincipalStore, V: PasswordVerifier> AuthenticationService<P, V> {
    pub fn new(store: Arc<P>, verifier: Arc<V>, tokens: TokenCodec) -> Self {
        Self {
            store,
            verifier,
            tokens,
        }
    }

    /// Check an email/secret pair against the store.
    ///
    /// Unknown principals and wrong secrets produce the same `Unauthorized`
    /// error and cost one hash verification each. Store failures propagate
    /// unchanged.
    pub async fn authenticate(&self, request: AuthenticationRequest<'_>) -> Result<Principal> {
        let Some(principal) = self
            .store
            .find_by_principal_id(request.principal_id)
            .await?
        else {
            let _ = self.verifier.verify(request.secret, DUMMY_PASSWORD_HASH);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !self
            .verifier
            .verify(request.secret, &principal.secret_hash)?
        {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Ok(principal)
    }

    /// Authenticate and issue a token whose subject is the principal's email
    pub async fn login(&self, credential: &Credential) -> Result<Token> {
        credential.validate()?;

        let principal = match self
            .authenticate(credential.to_authentication_request())
            .await
        {
            Ok(principal) => principal,
            Err(AppError::Unauthorized(msg)) => {
                warn!(principal_id = %credential.email, "Login rejected");
                return Err(AppError::Unauthorized(msg));
            }
            Err(e) => return Err(e),
        };

        let token = self.tokens.issue(&principal.email)?;
        info!(principal_id = %principal.email, "Login succeeded");
        Ok(token)
    }
}
