//! User registration and profile endpoints

use crate::domain::{PrincipalView, RegisterInput};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

pub async fn register<S: HasServices>(
    State(state): State<S>,
    body: std::result::Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<PrincipalView>)> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let principal = state.user_service().register(input).await?;
    Ok((StatusCode::CREATED, Json(PrincipalView::from(&principal))))
}

/// Profile of the caller identified by the request's security context
pub async fn me<S: HasServices>(
    AuthUser(context): AuthUser,
    State(state): State<S>,
) -> Result<Json<PrincipalView>> {
    let principal = state
        .user_service()
        .get_by_email(&context.principal_id)
        .await?;
    Ok(Json(PrincipalView::from(&principal)))
}
