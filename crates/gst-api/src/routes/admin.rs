//! Admin routes

use crate::auth::AuthUser;
use crate::db;
use crate::error::ApiError;
use crate::rbac::Capability;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_records: i64,
    pub authority_verified: i64,
    pub demo_fallback: i64,
    pub total_users: i64,
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<StatsResponse>, ApiError> {
    if !auth.role.allows(Capability::ViewStats) {
        return Err(ApiError::Forbidden);
    }

    let mut authority_verified = 0;
    let mut demo_fallback = 0;
    for (source, count) in db::count_records_by_source(&state.db).await? {
        match source.as_str() {
            "authority" => authority_verified = count,
            "demo" => demo_fallback = count,
            _ => {}
        }
    }

    let total_users = db::count_users(&state.db).await?;

    Ok(Json(StatsResponse {
        total_records: authority_verified + demo_fallback,
        authority_verified,
        demo_fallback,
        total_users,
    }))
}
