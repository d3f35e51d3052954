//! Request authorization
//!
//! Provides:
//! - `authorize_request` middleware that turns a bearer token into a
//!   per-request `SecurityContext`
//! - `AuthUser` / `OptionalAuth` extractors that read that context
//!
//! The middleware never rejects a request. Anything short of a valid token
//! for a known principal leaves the request anonymous, and route policy
//! (`require_auth`) decides what anonymous callers may reach.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::domain::SecurityContext;
use crate::error::error_response;
use crate::jwt::{TokenCodec, TokenError};
use crate::repository::PrincipalStore;

const BEARER_PREFIX: &str = "Bearer ";

/// Shared state for the authorization middleware
pub struct AuthorizationState<P: PrincipalStore> {
    codec: TokenCodec,
    store: Arc<P>,
}

impl<P: PrincipalStore> AuthorizationState<P> {
    pub fn new(codec: TokenCodec, store: Arc<P>) -> Self {
        Self { codec, store }
    }
}

impl<P: PrincipalStore> Clone for AuthorizationState<P> {
    fn clone(&self) -> Self {
        Self {
            codec: self.codec.clone(),
            store: self.store.clone(),
        }
    }
}

/// Why a presented token did not yield a security context
#[derive(Debug, Error)]
pub enum AuthorizationFailure {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("principal not found: {0}")]
    PrincipalNotFound(String),

    #[error("principal lookup failed: {0}")]
    Store(String),
}

/// Marks a request the middleware has already processed.
#[derive(Debug, Clone, Copy)]
struct AuthorizationApplied;

/// Token part of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-sensitively with exactly one space.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// Verify a token and resolve its subject to a security context
pub async fn authorize_token<P: PrincipalStore>(
    codec: &TokenCodec,
    store: &P,
    token: &str,
) -> Result<SecurityContext, AuthorizationFailure> {
    let claims = codec.verify(token)?;

    let principal = store
        .find_by_principal_id(&claims.sub)
        .await
        .map_err(|e| AuthorizationFailure::Store(e.to_string()))?;
    let principal = principal.ok_or(AuthorizationFailure::PrincipalNotFound(claims.sub))?;

    Ok(SecurityContext::from(&principal))
}

/// Resolve the request headers to a security context, if any.
pub async fn resolve_security_context<P: PrincipalStore>(
    codec: &TokenCodec,
    store: &P,
    headers: &HeaderMap,
) -> Option<SecurityContext> {
    let token = bearer_token(headers)?;

    match authorize_token(codec, store, token).await {
        Ok(context) => Some(context),
        Err(e) => {
            debug!(error = %e, "Bearer token rejected, continuing anonymously");
            None
        }
    }
}

/// Authorization middleware
///
/// Runs once per request: a request that already passed through it (for
/// example via a nested router carrying the same layer) is forwarded as-is.
pub async fn authorize_request<P: PrincipalStore + 'static>(
    State(state): State<AuthorizationState<P>>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<AuthorizationApplied>().is_some() {
        return next.run(request).await;
    }
    request.extensions_mut().insert(AuthorizationApplied);

    if let Some(context) =
        resolve_security_context(&state.codec, state.store.as_ref(), request.headers()).await
    {
        request.extensions_mut().insert(context);
    }

    next.run(request).await
}

/// Rejection for handlers that need an authenticated principal
#[derive(Debug, Clone, Copy)]
pub struct AuthRequired;

impl IntoResponse for AuthRequired {
    fn into_response(self) -> Response {
        error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Authentication required",
        )
    }
}

/// Axum extractor for authenticated principals
///
/// ```ignore
/// async fn me(AuthUser(context): AuthUser) -> String {
///     context.principal_id
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub SecurityContext);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRequired;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(AuthUser)
            .ok_or(AuthRequired)
    }
}

/// `Some` when the request carries a security context, `None` otherwise.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<SecurityContext>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<SecurityContext>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JwtConfig, DEFAULT_TOKEN_TTL_SECS};
    use crate::domain::{Principal, DEFAULT_ROLE};
    use crate::error::AppError;
    use crate::jwt::FixedClock;
    use crate::repository::{InMemoryPrincipalStore, MockPrincipalStore};
    use axum::{body::Body, http::Request as HttpRequest, routing::get, Json, Router};
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tower::ServiceExt;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-jwt-signing-must-be-long".to_string(),
            issuer: "Contabills".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(&jwt_config())
    }

    fn alice() -> Principal {
        Principal::new("Alice", "alice@x.com", "hash".to_string())
    }

    async fn store_with_alice() -> Arc<InMemoryPrincipalStore> {
        let store = InMemoryPrincipalStore::new();
        store.create(alice()).await.unwrap();
        Arc::new(store)
    }

    async fn whoami(OptionalAuth(context): OptionalAuth) -> Json<Option<SecurityContext>> {
        Json(context)
    }

    fn app<P: PrincipalStore + 'static>(state: AuthorizationState<P>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn_with_state(
                state,
                authorize_request::<P>,
            ))
    }

    async fn call(app: Router, authorization: Option<String>) -> Option<SecurityContext> {
        let mut builder = HttpRequest::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer test-token-123".parse().unwrap());

        assert_eq!(bearer_token(&headers), Some("test-token-123"));
    }

    #[rstest]
    #[case::missing(None)]
    #[case::basic(Some("Basic dXNlcjpwYXNz"))]
    #[case::lowercase_scheme(Some("bearer abc"))]
    #[case::no_space(Some("Bearerabc"))]
    fn test_bearer_token_absent(#[case] header: Option<&str>) {
        let mut headers = HeaderMap::new();
        if let Some(value) = header {
            headers.insert(AUTHORIZATION, value.parse().unwrap());
        }

        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_keeps_remainder_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer  padded".parse().unwrap());

        assert_eq!(bearer_token(&headers), Some(" padded"));
    }

    #[tokio::test]
    async fn test_authorize_token_success() {
        let store = store_with_alice().await;
        let token = codec().issue("alice@x.com").unwrap();

        let context = authorize_token(&codec(), store.as_ref(), &token.token)
            .await
            .unwrap();

        assert_eq!(context.principal_id, "alice@x.com");
        assert_eq!(context.roles, vec![DEFAULT_ROLE.to_string()]);
    }

    #[tokio::test]
    async fn test_authorize_token_unknown_principal() {
        let store = store_with_alice().await;
        let token = codec().issue("ghost@x.com").unwrap();

        let result = authorize_token(&codec(), store.as_ref(), &token.token).await;
        assert!(matches!(
            result,
            Err(AuthorizationFailure::PrincipalNotFound(ref id)) if id == "ghost@x.com"
        ));
    }

    #[tokio::test]
    async fn test_authorize_token_invalid_token_skips_store() {
        let mut store = MockPrincipalStore::new();
        store.expect_find_by_principal_id().never();

        let result = authorize_token(&codec(), &store, "garbage").await;
        assert!(matches!(
            result,
            Err(AuthorizationFailure::Token(TokenError::Malformed(_)))
        ));
    }

    #[tokio::test]
    async fn test_authorize_token_store_failure() {
        let mut store = MockPrincipalStore::new();
        store
            .expect_find_by_principal_id()
            .returning(|_| Err(AppError::Internal(anyhow::anyhow!("connection reset"))));
        let token = codec().issue("alice@x.com").unwrap();

        let result = authorize_token(&codec(), &store, &token.token).await;
        assert!(matches!(result, Err(AuthorizationFailure::Store(_))));
    }

    #[tokio::test]
    async fn test_middleware_installs_context() {
        let store = store_with_alice().await;
        let token = codec().issue("alice@x.com").unwrap();

        let context = call(
            app(AuthorizationState::new(codec(), store)),
            Some(format!("Bearer {}", token.token)),
        )
        .await;

        assert_eq!(
            context,
            Some(SecurityContext {
                principal_id: "alice@x.com".to_string(),
                roles: vec![DEFAULT_ROLE.to_string()],
            })
        );
    }

    #[rstest]
    #[case::no_header(None)]
    #[case::basic_scheme(Some("Basic xyz".to_string()))]
    #[case::garbage_token(Some("Bearer garbage".to_string()))]
    #[case::empty_token(Some("Bearer ".to_string()))]
    #[tokio::test]
    async fn test_middleware_falls_back_to_anonymous(#[case] header: Option<String>) {
        let store = store_with_alice().await;

        let context = call(app(AuthorizationState::new(codec(), store)), header).await;
        assert_eq!(context, None);
    }

    #[tokio::test]
    async fn test_middleware_expired_token_is_anonymous() {
        let store = store_with_alice().await;
        let nine_hours_ago = Utc::now() - Duration::hours(9);
        let stale = TokenCodec::with_clock(&jwt_config(), Arc::new(FixedClock(nine_hours_ago)))
            .issue("alice@x.com")
            .unwrap();

        let context = call(
            app(AuthorizationState::new(codec(), store)),
            Some(format!("Bearer {}", stale.token)),
        )
        .await;
        assert_eq!(context, None);
    }

    #[tokio::test]
    async fn test_middleware_store_failure_is_anonymous() {
        let mut store = MockPrincipalStore::new();
        store
            .expect_find_by_principal_id()
            .returning(|_| Err(AppError::Internal(anyhow::anyhow!("connection reset"))));
        let token = codec().issue("alice@x.com").unwrap();

        let context = call(
            app(AuthorizationState::new(codec(), Arc::new(store))),
            Some(format!("Bearer {}", token.token)),
        )
        .await;
        assert_eq!(context, None);
    }

    #[tokio::test]
    async fn test_middleware_runs_once_per_request() {
        let mut store = MockPrincipalStore::new();
        store
            .expect_find_by_principal_id()
            .times(1)
            .returning(|_| Ok(Some(alice())));
        let state = AuthorizationState::new(codec(), Arc::new(store));
        let token = codec().issue("alice@x.com").unwrap();

        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                authorize_request::<MockPrincipalStore>,
            ))
            .layer(axum::middleware::from_fn_with_state(
                state,
                authorize_request::<MockPrincipalStore>,
            ));

        let context = call(app, Some(format!("Bearer {}", token.token))).await;
        assert_eq!(
            context.map(|c| c.principal_id),
            Some("alice@x.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_auth_user_rejects_anonymous() {
        async fn protected(AuthUser(context): AuthUser) -> String {
            context.principal_id
        }

        let store = store_with_alice().await;
        let app = Router::new()
            .route("/protected", get(protected))
            .layer(axum::middleware::from_fn_with_state(
                AuthorizationState::new(codec(), store),
                authorize_request::<InMemoryPrincipalStore>,
            ));

        let response = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let token = codec().issue("alice@x.com").unwrap();
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(AUTHORIZATION, format!("Bearer {}", token.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"alice@x.com");
    }

    #[test]
    fn test_auth_required_response() {
        let response = AuthRequired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
