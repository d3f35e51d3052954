//! HTTP middleware for Contabills Auth
//!
//! - Bearer token authorization and the `AuthUser` extractor
//! - Route-level access policy
//! - Error response normalization
//! - Request tracing with credential redaction

pub mod auth;
pub mod error_response;
pub mod require_auth;
pub mod trace;

pub use auth::{authorize_request, AuthUser, AuthorizationState, OptionalAuth};
pub use error_response::normalize_error_response;
pub use require_auth::{require_authenticated, AccessPolicy};
pub use trace::SanitizedMakeSpan;
