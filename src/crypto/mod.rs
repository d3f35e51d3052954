//! Cryptographic utilities for Contabills Auth

pub mod password;

pub use password::{
    Argon2PasswordHasher, PasswordHasher, PasswordVerifier, DUMMY_PASSWORD_HASH,
};

#[cfg(test)]
pub use password::{MockPasswordHasher, MockPasswordVerifier};
