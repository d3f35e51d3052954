//! Data access layer (Repository pattern)

pub mod principal;

pub use principal::{InMemoryPrincipalStore, PrincipalStore};

#[cfg(test)]
pub use principal::MockPrincipalStore;
