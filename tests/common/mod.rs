//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use contabills_auth::config::{
    Config, JwtConfig, SecurityConfig, TelemetryConfig, DEFAULT_TOKEN_TTL_SECS,
};
use contabills_auth::domain::{Principal, RegisterInput};
use contabills_auth::error::{AppError, Result};
use contabills_auth::jwt::{FixedClock, TokenCodec};
use contabills_auth::repository::{InMemoryPrincipalStore, PrincipalStore};
use contabills_auth::server::{build_router, AppState};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tower::ServiceExt;

pub const ALICE_EMAIL: &str = "alice@x.com";
pub const ALICE_SECRET: &str = "correct-secret";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-api-testing-purposes".to_string(),
        issuer: "Contabills".to_string(),
        token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
    }
}

pub fn test_config() -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 0,
        jwt: test_jwt_config(),
        security: SecurityConfig::default(),
        telemetry: TelemetryConfig::default(),
        seed_users: vec![],
    }
}

/// Codec with the test key whose clock is frozen at `instant`
pub fn codec_at(instant: DateTime<Utc>) -> TokenCodec {
    TokenCodec::with_clock(&test_jwt_config(), Arc::new(FixedClock(instant)))
}

/// Router backed by a fresh in-memory store holding alice
pub async fn test_app() -> Router {
    test_app_with_config(test_config()).await
}

pub async fn test_app_with_config(config: Config) -> Router {
    let state = AppState::new(config, Arc::new(InMemoryPrincipalStore::new()));
    state
        .user_service
        .register(RegisterInput {
            name: "Alice".to_string(),
            email: ALICE_EMAIL.to_string(),
            password: ALICE_SECRET.to_string(),
            confirm_password: None,
        })
        .await
        .unwrap();
    build_router(state)
}

/// Store that fails every call
pub struct UnavailablePrincipalStore;

#[async_trait]
impl PrincipalStore for UnavailablePrincipalStore {
    async fn find_by_principal_id(&self, _principal_id: &str) -> Result<Option<Principal>> {
        Err(AppError::Internal(anyhow::anyhow!("store unavailable")))
    }

    async fn create(&self, _principal: Principal) -> Result<Principal> {
        Err(AppError::Internal(anyhow::anyhow!("store unavailable")))
    }
}

async fn send<R: DeserializeOwned>(app: &Router, request: Request<Body>) -> (StatusCode, Option<R>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    if body_bytes.is_empty() {
        return (status, None);
    }

    match serde_json::from_slice(&body_bytes) {
        Ok(data) => (status, Some(data)),
        Err(_) => (status, None),
    }
}

/// Make a GET request and parse JSON response
pub async fn get_json<R: DeserializeOwned>(app: &Router, path: &str) -> (StatusCode, Option<R>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Make a GET request carrying a raw Authorization header value
pub async fn get_json_with_auth<R: DeserializeOwned>(
    app: &Router,
    path: &str,
    authorization: &str,
) -> (StatusCode, Option<R>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Make a POST request with JSON body and parse JSON response
pub async fn post_json<T: Serialize, R: DeserializeOwned>(
    app: &Router,
    path: &str,
    body: &T,
) -> (StatusCode, Option<R>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// POST a raw body as JSON
pub async fn post_raw<R: DeserializeOwned>(
    app: &Router,
    path: &str,
    body: &'static str,
) -> (StatusCode, Option<R>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}
