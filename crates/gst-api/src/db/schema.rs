//! Database row types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One verified GST registration bound to one application user
#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct GstRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gst_number: String,
    pub trade_name: String,
    pub legal_name: String,
    pub pan_number: String,
    pub address: String,
    /// 'authority' or 'demo' -- whether the company fields came from
    /// the verification API or the labeled fallback
    pub source: String,
    pub verified_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
