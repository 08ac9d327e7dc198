//! Authentication routes

use crate::auth::{create_token, password_digest, AuthUser, TOKEN_TTL_SECS};
use crate::db;
use crate::error::ApiError;
use crate::rbac::Role;
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = db::user_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if user.password_hash != password_digest(&payload.password) {
        return Err(ApiError::Unauthorized);
    }

    let role = Role::parse(&user.role)
        .ok_or_else(|| ApiError::Internal(format!("unknown role '{}'", user.role)))?;

    let token = create_token(user.id, role, &state.config.jwt_secret)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        token,
        expires_in: TOKEN_TTL_SECS,
    }))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = db::user_by_id(&state.db, auth.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserResponse {
        id: user.id,
        email: user.email,
        role: auth.role,
    }))
}
