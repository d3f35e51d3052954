//! Application state traits for dependency injection
//!
//! Handlers and the router are generic over `HasServices`, so the same code
//! runs against the production `AppState` and test states.

use crate::config::Config;
use crate::crypto::{PasswordHasher, PasswordVerifier};
use crate::jwt::TokenCodec;
use crate::repository::PrincipalStore;
use crate::service::{AuthenticationService, UserService};
use std::sync::Arc;

pub trait HasServices: Clone + Send + Sync + 'static {
    /// The principal store type
    type Store: PrincipalStore + 'static;
    /// The password hasher type (also verifies)
    type Hasher: PasswordHasher + PasswordVerifier + 'static;

    fn config(&self) -> &Config;

    fn token_codec(&self) -> &TokenCodec;

    fn principal_store(&self) -> &Arc<Self::Store>;

    fn auth_service(&self) -> &AuthenticationService<Self::Store, Self::Hasher>;

    fn user_service(&self) -> &UserService<Self::Store, Self::Hasher>;
}
