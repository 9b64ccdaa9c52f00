//! Member endpoints: registration, roster, profiles

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Member, MemberCreate, MemberUpdate, ROLE_ADMIN, ROLE_USER};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::internal;
use crate::state::AppState;
use crate::util::{hash_password, non_empty, verify_password};

use super::ApiResult;

pub const MIN_PASSWORD_LEN: usize = 6;

/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<MemberCreate>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let name = non_empty(&req.name).ok_or_else(|| AppError::required("name"))?;
    let username = non_empty(&req.username).ok_or_else(|| AppError::required("username"))?;
    if req.password.is_empty() {
        return Err(AppError::required("password"));
    }

    if db::users::username_taken(&state.pool, &username, None)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::UsernameExists));
    }

    let hashed = hash_password(&req.password).map_err(internal)?;
    let image = req.image.as_deref().and_then(non_empty);
    let member = db::users::create(
        &state.pool,
        &db::users::NewUser {
            name: &name,
            username: &username,
            hashed_password: &hashed,
            image: image.as_deref(),
            role: ROLE_USER,
        },
        shared::util::now_millis(),
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            AppError::new(ErrorCode::UsernameExists)
        } else {
            internal(e)
        }
    })?;

    tracing::info!(user_id = member.id, username = %member.username, "Member registered");
    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /api/users
pub async fn list(State(state): State<AppState>, _user: CurrentUser) -> ApiResult<Vec<Member>> {
    let members = db::users::list(&state.pool).await.map_err(internal)?;
    Ok(Json(members))
}

/// GET /api/users/me
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Member> {
    get_member(&state, user.id).await.map(Json)
}

/// GET /api/users/{id}
pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Member> {
    get_member(&state, id).await.map(Json)
}

async fn get_member(state: &AppState, id: i64) -> Result<Member, AppError> {
    db::users::find_member(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<MemberUpdate>,
) -> ApiResult<Member> {
    if !user.can_manage(id) {
        return Err(AppError::forbidden("You can only update your own profile"));
    }

    let row = db::users::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;
    let hashed_password = row.hashed_password.clone();
    let mut member = row.into_member();

    if let Some(name) = req.name.as_deref() {
        member.name = non_empty(name).ok_or_else(|| AppError::required("name"))?;
    }
    if let Some(image) = req.image.as_deref() {
        member.image = non_empty(image);
    }
    if let Some(username) = req.username.as_deref() {
        let username = non_empty(username).ok_or_else(|| AppError::required("username"))?;
        if db::users::username_taken(&state.pool, &username, Some(id))
            .await
            .map_err(internal)?
        {
            return Err(AppError::new(ErrorCode::UsernameExists));
        }
        member.username = username;
    }
    if let Some(role) = req.role.as_deref() {
        if user.is_admin() {
            if role != ROLE_ADMIN && role != ROLE_USER {
                return Err(AppError::validation(format!("Unknown role: {role}"))
                    .with_detail("field", "role"));
            }
            member.role = role.to_string();
        } else {
            tracing::debug!(user_id = user.id, "Ignoring role change from non-admin");
        }
    }

    // Validate the password change before writing anything
    let new_hash = match req.new_password.as_deref() {
        Some(new_password) => {
            let current = req
                .current_password
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| AppError::new(ErrorCode::CurrentPasswordInvalid))?;
            if !verify_password(current, &hashed_password) {
                return Err(AppError::new(ErrorCode::CurrentPasswordInvalid));
            }
            if new_password.chars().count() < MIN_PASSWORD_LEN {
                return Err(AppError::new(ErrorCode::PasswordTooShort));
            }
            Some(hash_password(new_password).map_err(internal)?)
        }
        None => None,
    };

    let password_changed = new_hash.is_some();
    let updated = db::users::update(&state.pool, &member, new_hash.as_deref())
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                AppError::new(ErrorCode::UsernameExists)
            } else {
                internal(e)
            }
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    if password_changed {
        tracing::info!(user_id = id, "Password changed");
    }

    Ok(Json(updated))
}
