use chrono::{DateTime, Utc};
use eyre::WrapErr;
use sqlx::{Pool, Postgres};
use timeline_core::errors::TimelineResult;

pub async fn delete_expired_codes(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
) -> TimelineResult<u64> {
    let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at < $1")
        .bind(now)
        .execute(pool)
        .await
        .wrap_err("failed to delete expired codes")?;

    Ok(result.rows_affected())
}

/// Verified organizations are never removed here.
pub async fn org_delete_expired(
    pool: &Pool<Postgres>,
    cutoff: DateTime<Utc>,
) -> TimelineResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM orgs
        WHERE verified = FALSE
        AND created_at < $1
        "#,
    )
    .bind(cutoff)
    .execute(pool)
    .await
    .wrap_err("failed to delete unverified orgs")?;

    Ok(result.rows_affected())
}

/// Slots booked by a removed user are released along with the cascaded
/// records.
pub async fn user_delete_expired(
    pool: &Pool<Postgres>,
    cutoff: DateTime<Utc>,
) -> TimelineResult<u64> {
    let removed: i64 = sqlx::query_scalar(
        r#"
        WITH removed AS (
            DELETE FROM users
            WHERE verified = FALSE
            AND created_at < $1
            RETURNING user_id
        ), released AS (
            UPDATE slots SET busy = FALSE
            WHERE slot_id IN (
                SELECT r.slot_id FROM records r
                JOIN removed ON removed.user_id = r.user_id
            )
        )
        SELECT COUNT(*) FROM removed
        "#,
    )
    .bind(cutoff)
    .fetch_one(pool)
    .await
    .wrap_err("failed to delete unverified users")?;

    Ok(u64::try_from(removed).unwrap_or_default())
}
