//! Authentication endpoints: login, verify-token

use axum::{Json, extract::State};
use shared::client::{LoginRequest, LoginResponse, VerifyTokenResponse};
use shared::error::{AppError, ErrorCode};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::internal;
use crate::state::AppState;
use crate::util::verify_password;

use super::ApiResult;

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::required("username"));
    }
    if req.password.is_empty() {
        return Err(AppError::required("password"));
    }

    let user = db::users::find_by_username(&state.pool, username)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !verify_password(&req.password, &user.hashed_password) {
        tracing::info!(username = %username, "Login rejected");
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let member = user.into_member();
    let token = state.jwt_service.generate_token(&member).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    tracing::info!(user_id = member.id, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        user: member,
    }))
}

/// POST /api/verify-token
pub async fn verify_token(user: CurrentUser) -> ApiResult<VerifyTokenResponse> {
    Ok(Json(VerifyTokenResponse {
        valid: true,
        user: user.claims,
    }))
}
