//! Contabills Auth - stateless token authentication service
//!
//! Issues HS256 session tokens on login and resolves the bearer token on
//! each request into a per-request security context.

pub mod api;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
