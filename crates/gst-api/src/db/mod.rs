//! Persistence layer
//!
//! Runtime-checked sqlx queries against Postgres. `gst_records`
//! carries a composite UNIQUE (user_id, gst_number), so the upsert is
//! a single atomic statement rather than a find-then-write sequence.

pub mod schema;

use gst_core::VerificationResult;
use schema::{GstRecord, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert or refresh the record for (user, GST number) in one
/// statement; repeated verifications update the fields in place and
/// bump `verified_at`.
pub async fn upsert_record(
    pool: &PgPool,
    user_id: Uuid,
    result: &VerificationResult,
) -> sqlx::Result<GstRecord> {
    sqlx::query_as::<_, GstRecord>(
        r#"
        INSERT INTO gst_records
            (id, user_id, gst_number, trade_name, legal_name, pan_number, address, source, verified_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        ON CONFLICT (user_id, gst_number) DO UPDATE SET
            trade_name = EXCLUDED.trade_name,
            legal_name = EXCLUDED.legal_name,
            pan_number = EXCLUDED.pan_number,
            address = EXCLUDED.address,
            source = EXCLUDED.source,
            verified_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&result.gst_number)
    .bind(&result.trade_name)
    .bind(&result.legal_name)
    .bind(&result.pan_number)
    .bind(&result.address)
    .bind(result.source.as_str())
    .fetch_one(pool)
    .await
}

/// Most recently verified record for a user, if any.
pub async fn latest_for_user(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Option<GstRecord>> {
    sqlx::query_as::<_, GstRecord>(
        "SELECT * FROM gst_records WHERE user_id = $1 ORDER BY verified_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn user_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn user_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Record counts grouped by verification source; makes demo-fallback
/// volume observable.
pub async fn count_records_by_source(pool: &PgPool) -> sqlx::Result<Vec<(String, i64)>> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT source, COUNT(*) FROM gst_records GROUP BY source",
    )
    .fetch_all(pool)
    .await
}

pub async fn count_users(pool: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}
