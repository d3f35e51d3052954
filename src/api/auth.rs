//! Login endpoint

use crate::domain::{Credential, Token};
use crate::error::{AppError, Result};
use crate::state::HasServices;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

/// Exchange an email/password pair for a bearer token
pub async fn login<S: HasServices>(
    State(state): State<S>,
    body: std::result::Result<Json<Credential>, JsonRejection>,
) -> Result<Json<Token>> {
    let Json(credential) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let token = state.auth_service().login(&credential).await?;
    Ok(Json(token))
}
