//! Domain models for Contabills Auth

pub mod credential;
pub mod principal;
pub mod security;
pub mod token;

pub use credential::*;
pub use principal::*;
pub use security::*;
pub use token::*;
