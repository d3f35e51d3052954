//! Route-level access policy
//!
//! Applied to protected route groups after `authorize_request`. A request is
//! let through when it carries a `SecurityContext`, or when the policy is
//! configured to permit everything (local development).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::config::SecurityConfig;
use crate::domain::SecurityContext;
use crate::error::error_response;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    permit_all: bool,
}

impl AccessPolicy {
    pub fn new(permit_all: bool) -> Self {
        Self { permit_all }
    }
}

impl From<&SecurityConfig> for AccessPolicy {
    fn from(config: &SecurityConfig) -> Self {
        Self::new(config.permit_all)
    }
}

/// Reject anonymous requests with 401 unless the policy permits all.
pub async fn require_authenticated(
    State(policy): State<AccessPolicy>,
    request: Request,
    next: Next,
) -> Response {
    if policy.permit_all || request.extensions().get::<SecurityContext>().is_some() {
        return next.run(request).await;
    }

    debug!(path = %request.uri().path(), "Anonymous request to protected route");
    error_response(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "Authentication required",
    )
}
