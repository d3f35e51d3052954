//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::crypto::Argon2PasswordHasher;
use crate::jwt::TokenCodec;
use crate::middleware::{
    authorize_request, normalize_error_response, require_authenticated, AccessPolicy,
    AuthorizationState, SanitizedMakeSpan,
};
use crate::repository::{InMemoryPrincipalStore, PrincipalStore};
use crate::service::{AuthenticationService, UserService};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
pub struct AppState<P: PrincipalStore = InMemoryPrincipalStore> {
    pub config: Arc<Config>,
    pub token_codec: TokenCodec,
    pub principal_store: Arc<P>,
    pub auth_service: Arc<AuthenticationService<P, Argon2PasswordHasher>>,
    pub user_service: Arc<UserService<P, Argon2PasswordHasher>>,
}

impl<P: PrincipalStore> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            token_codec: self.token_codec.clone(),
            principal_store: self.principal_store.clone(),
            auth_service: self.auth_service.clone(),
            user_service: self.user_service.clone(),
        }
    }
}

impl<P: PrincipalStore> AppState<P> {
    pub fn new(config: Config, principal_store: Arc<P>) -> Self {
        let token_codec = TokenCodec::new(&config.jwt);
        let hasher = Arc::new(Argon2PasswordHasher);

        Self {
            auth_service: Arc::new(AuthenticationService::new(
                principal_store.clone(),
                hasher.clone(),
                token_codec.clone(),
            )),
            user_service: Arc::new(UserService::new(principal_store.clone(), hasher)),
            config: Arc::new(config),
            token_codec,
            principal_store,
        }
    }
}

impl<P: PrincipalStore + 'static> HasServices for AppState<P> {
    type Store = P;
    type Hasher = Argon2PasswordHasher;

    fn config(&self) -> &Config {
        &self.config
    }

    fn token_codec(&self) -> &TokenCodec {
        &self.token_codec
    }

    fn principal_store(&self) -> &Arc<P> {
        &self.principal_store
    }

    fn auth_service(&self) -> &AuthenticationService<P, Argon2PasswordHasher> {
        &self.auth_service
    }

    fn user_service(&self) -> &UserService<P, Argon2PasswordHasher> {
        &self.user_service
    }
}

/// Run the HTTP server until interrupted
pub async fn run(config: Config) -> Result<()> {
    let seed_users = config.seed_users.clone();
    let state = AppState::new(config, Arc::new(InMemoryPrincipalStore::new()));

    if !seed_users.is_empty() {
        let created = state.user_service.seed(&seed_users).await?;
        info!("Seeded {} of {} configured users", created, seed_users.len());
    }

    if state.config.security.permit_all {
        tracing::warn!("SECURITY_PERMIT_ALL is enabled: protected routes accept anonymous requests");
    }

    let http_addr = state.config.http_addr();
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Build the HTTP router
///
/// Every route passes through `authorize_request`. Routes in the protected
/// group additionally go through the access policy.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let authorization = AuthorizationState::new(
        state.token_codec().clone(),
        state.principal_store().clone(),
    );
    let policy = AccessPolicy::from(&state.config().security);

    let public = Router::new()
        .route("/health", get(api::health::health))
        .route("/api/v1/users/login", post(api::auth::login::<S>))
        .route("/api/v1/users/register", post(api::user::register::<S>))
        // Paths used by existing Contabills clients
        .route("/usuarios/login", post(api::auth::login::<S>))
        .route("/usuarios/cadastro", post(api::user::register::<S>));

    let protected = Router::new()
        .route("/api/v1/users/me", get(api::user::me::<S>))
        .route_layer(axum::middleware::from_fn_with_state(
            policy,
            require_authenticated,
        ));

    public
        .merge(protected)
        .layer(axum::middleware::from_fn_with_state(
            authorization,
            authorize_request::<S::Store>,
        ))
        .layer(axum::middleware::from_fn(normalize_error_response))
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(cors)
        .with_state(state)
}
