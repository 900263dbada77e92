use std::ops::Range;

use crate::{models::DbSlot, repositories::db_error};
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use sqlx::{PgConnection, Pool, Postgres};
use timeline_core::{
    errors::{TimelineError, TimelineResult},
    models::slot::{Slot, SlotDraft},
};
use uuid::Uuid;

/// Inserts generated slots, ignoring drafts whose (worker, start) already
/// exists. Returns how many rows were created.
pub async fn insert_slots(pool: &Pool<Postgres>, drafts: &[SlotDraft]) -> TimelineResult<u64> {
    if drafts.is_empty() {
        return Ok(0);
    }

    let worker_ids: Vec<Uuid> = drafts.iter().map(|d| d.worker_id).collect();
    let org_ids: Vec<Uuid> = drafts.iter().map(|d| d.org_id).collect();
    let starts: Vec<DateTime<Utc>> = drafts.iter().map(|d| d.start).collect();
    let ends: Vec<DateTime<Utc>> = drafts.iter().map(|d| d.end).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO slots (worker_id, org_id, start_time, end_time)
        SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::timestamptz[], $4::timestamptz[])
        ON CONFLICT (worker_id, start_time) DO NOTHING
        "#,
    )
    .bind(worker_ids)
    .bind(org_ids)
    .bind(starts)
    .bind(ends)
    .execute(pool)
    .await
    .map_err(|e| db_error(e, "failed to insert slots"))?;

    Ok(result.rows_affected())
}

pub async fn slot_by_id(pool: &Pool<Postgres>, slot_id: Uuid) -> TimelineResult<Slot> {
    let row = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT slot_id, worker_id, org_id, start_time, end_time, busy
        FROM slots
        WHERE slot_id = $1
        "#,
    )
    .bind(slot_id)
    .fetch_optional(pool)
    .await
    .wrap_err("failed to get slot by id")?;

    row.map(Into::into)
        .ok_or_else(|| TimelineError::NotFound(format!("Slot with ID {} not found", slot_id)))
}

pub async fn slots(
    pool: &Pool<Postgres>,
    worker_id: Uuid,
    range: Range<DateTime<Utc>>,
) -> TimelineResult<Vec<Slot>> {
    let rows = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT slot_id, worker_id, org_id, start_time, end_time, busy
        FROM slots
        WHERE worker_id = $1
        AND start_time >= $2
        AND start_time < $3
        ORDER BY start_time ASC
        "#,
    )
    .bind(worker_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await
    .wrap_err("failed to list slots")?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Marks a free, not yet started slot as busy.
///
/// The transition is a single conditional statement; the follow-up read
/// only explains why nothing was updated.
pub(crate) async fn claim_slot(conn: &mut PgConnection, slot_id: Uuid) -> TimelineResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET busy = TRUE
        WHERE slot_id = $1
        AND busy = FALSE
        AND start_time > NOW()
        "#,
    )
    .bind(slot_id)
    .execute(&mut *conn)
    .await
    .wrap_err("failed to claim slot")?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    let busy = sqlx::query_scalar::<_, bool>("SELECT busy FROM slots WHERE slot_id = $1")
        .bind(slot_id)
        .fetch_optional(&mut *conn)
        .await
        .wrap_err("failed to inspect slot")?;

    match busy {
        None => Err(TimelineError::NotFound(format!(
            "Slot with ID {} not found",
            slot_id
        ))),
        Some(true) => Err(TimelineError::SlotUnavailable { slot_id }),
        Some(false) => Err(TimelineError::Validation(format!(
            "Slot {} has already started",
            slot_id
        ))),
    }
}

pub(crate) async fn release_slot(conn: &mut PgConnection, slot_id: Uuid) -> TimelineResult<()> {
    let result = sqlx::query("UPDATE slots SET busy = FALSE WHERE slot_id = $1")
        .bind(slot_id)
        .execute(&mut *conn)
        .await
        .wrap_err("failed to release slot")?;

    if result.rows_affected() == 0 {
        return Err(TimelineError::NotFound(format!(
            "Slot with ID {} not found",
            slot_id
        )));
    }
    Ok(())
}

pub async fn update_slot(pool: &Pool<Postgres>, slot_id: Uuid, busy: bool) -> TimelineResult<()> {
    let mut conn = pool.acquire().await.wrap_err("failed to acquire connection")?;
    if busy {
        claim_slot(&mut conn, slot_id).await
    } else {
        release_slot(&mut conn, slot_id).await
    }
}

/// Removes every slot that has ended, busy or not. Records on those slots go
/// with them.
pub async fn delete_expired_slots(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
) -> TimelineResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM slots
        WHERE end_time < $1
        "#,
    )
    .bind(now)
    .execute(pool)
    .await
    .wrap_err("failed to delete expired slots")?;

    Ok(result.rows_affected())
}
