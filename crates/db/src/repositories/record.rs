use std::ops::Range;

use crate::{
    models::{DbFeedback, DbRecord, DbReminder},
    repositories::{
        db_error,
        slot::{claim_slot, release_slot},
    },
};
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use sqlx::{PgConnection, Pool, Postgres};
use timeline_core::{
    errors::{TimelineError, TimelineResult},
    models::record::{
        Feedback, NewRecord, Record, RecordList, RecordListParams, RecordPatch, Reminder,
    },
};
use tracing::debug;
use uuid::Uuid;

const RECORD_COLUMNS: &str =
    "record_id, org_id, user_id, slot_id, service_id, worker_id, reviewed, created_at";

fn record_not_found(record_id: Uuid) -> TimelineError {
    TimelineError::NotFound(format!("Record with ID {} not found", record_id))
}

pub async fn record_by_id(pool: &Pool<Postgres>, record_id: Uuid) -> TimelineResult<Record> {
    let row = sqlx::query_as::<_, DbRecord>(&format!(
        "SELECT {RECORD_COLUMNS} FROM records WHERE record_id = $1"
    ))
    .bind(record_id)
    .fetch_optional(pool)
    .await
    .wrap_err("failed to get record by id")?;

    row.map(Into::into).ok_or_else(|| record_not_found(record_id))
}

pub async fn record_list(
    pool: &Pool<Postgres>,
    params: &RecordListParams,
) -> TimelineResult<RecordList> {
    let found = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM records
        WHERE ($1::uuid IS NULL OR org_id = $1)
        AND ($2::uuid IS NULL OR user_id = $2)
        AND ($3::bool IS NULL OR reviewed = $3)
        "#,
    )
    .bind(params.org_id)
    .bind(params.user_id)
    .bind(params.reviewed)
    .fetch_one(pool)
    .await
    .wrap_err("failed to count records")?;

    let rows = sqlx::query_as::<_, DbRecord>(&format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM records
        WHERE ($1::uuid IS NULL OR org_id = $1)
        AND ($2::uuid IS NULL OR user_id = $2)
        AND ($3::bool IS NULL OR reviewed = $3)
        ORDER BY created_at DESC
        LIMIT $4
        OFFSET $5
        "#
    ))
    .bind(params.org_id)
    .bind(params.user_id)
    .bind(params.reviewed)
    .bind(params.limit)
    .bind(params.offset)
    .fetch_all(pool)
    .await
    .wrap_err("failed to list records")?;

    Ok(RecordList {
        records: rows.into_iter().map(Into::into).collect(),
        found,
    })
}

async fn reminder_for(conn: &mut PgConnection, record_id: Uuid) -> TimelineResult<Reminder> {
    let row = sqlx::query_as::<_, DbReminder>(
        r#"
        SELECT r.record_id, r.org_id, r.user_id, r.slot_id, r.service_id, r.worker_id,
               r.reviewed, r.created_at,
               u.email AS user_email, s.start_time AS slot_start, s.end_time AS slot_end
        FROM records r
        JOIN slots s ON s.slot_id = r.slot_id
        JOIN users u ON u.user_id = r.user_id
        WHERE r.record_id = $1
        "#,
    )
    .bind(record_id)
    .fetch_optional(&mut *conn)
    .await
    .wrap_err("failed to load reminder details")?;

    row.map(Into::into).ok_or_else(|| record_not_found(record_id))
}

/// A second record on the same slot is a lost claim, not a generic conflict.
fn booking_error(err: sqlx::Error, slot_id: Uuid) -> TimelineError {
    let slot_taken = matches!(
        &err,
        sqlx::Error::Database(db) if db.constraint() == Some("one_record_per_slot")
    );
    if slot_taken {
        return TimelineError::SlotUnavailable { slot_id };
    }
    db_error(err, "failed to save record")
}

/// Books a slot: claims it and writes the record in one transaction.
///
/// Any early return drops the transaction, which rolls back the claim.
pub async fn record_add(pool: &Pool<Postgres>, new_record: &NewRecord) -> TimelineResult<Reminder> {
    let mut tx = pool.begin().await.wrap_err("failed to start tx")?;

    let owner = sqlx::query_as::<_, (Uuid, Uuid)>(
        "SELECT worker_id, org_id FROM slots WHERE slot_id = $1",
    )
    .bind(new_record.slot_id)
    .fetch_optional(&mut *tx)
    .await
    .wrap_err("failed to read slot owner")?;

    match owner {
        None => {
            return Err(TimelineError::NotFound(format!(
                "Slot with ID {} not found",
                new_record.slot_id
            )));
        }
        Some((worker_id, org_id))
            if worker_id != new_record.worker_id || org_id != new_record.org_id =>
        {
            return Err(TimelineError::Validation(format!(
                "Slot {} does not belong to worker {} of org {}",
                new_record.slot_id, new_record.worker_id, new_record.org_id
            )));
        }
        Some(_) => {}
    }

    let offered = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM services WHERE service_id = $1 AND org_id = $2)",
    )
    .bind(new_record.service_id)
    .bind(new_record.org_id)
    .fetch_one(&mut *tx)
    .await
    .wrap_err("failed to read service")?;

    if !offered {
        return Err(TimelineError::NotFound(format!(
            "Service with ID {} not found",
            new_record.service_id
        )));
    }

    claim_slot(&mut tx, new_record.slot_id).await?;

    let record_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO records (record_id, org_id, user_id, slot_id, service_id, worker_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(record_id)
    .bind(new_record.org_id)
    .bind(new_record.user_id)
    .bind(new_record.slot_id)
    .bind(new_record.service_id)
    .bind(new_record.worker_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| booking_error(e, new_record.slot_id))?;

    let reminder = reminder_for(&mut tx, record_id).await?;

    tx.commit().await.wrap_err("failed to commit tx")?;
    debug!(record_id = %record_id, slot_id = %new_record.slot_id, "slot claimed");
    Ok(reminder)
}

pub async fn record_patch(pool: &Pool<Postgres>, patch: &RecordPatch) -> TimelineResult<Record> {
    let row = sqlx::query_as::<_, DbRecord>(&format!(
        r#"
        UPDATE records
        SET reviewed = $2
        WHERE record_id = $1
        RETURNING {RECORD_COLUMNS}
        "#
    ))
    .bind(patch.record_id)
    .bind(patch.reviewed)
    .fetch_optional(pool)
    .await
    .wrap_err("failed to patch record")?;

    row.map(Into::into)
        .ok_or_else(|| record_not_found(patch.record_id))
}

/// Cancels a booking. The record removal and the slot release commit
/// together or not at all.
pub async fn record_delete(pool: &Pool<Postgres>, record_id: Uuid) -> TimelineResult<()> {
    let mut tx = pool.begin().await.wrap_err("failed to start tx")?;

    let slot_id = sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM records WHERE record_id = $1 RETURNING slot_id",
    )
    .bind(record_id)
    .fetch_optional(&mut *tx)
    .await
    .wrap_err("failed to delete record")?
    .ok_or_else(|| record_not_found(record_id))?;

    release_slot(&mut tx, slot_id).await?;

    tx.commit().await.wrap_err("failed to commit tx")?;
    debug!(record_id = %record_id, slot_id = %slot_id, "slot released");
    Ok(())
}

pub async fn upcoming_records(
    pool: &Pool<Postgres>,
    window: Range<DateTime<Utc>>,
) -> TimelineResult<Vec<Reminder>> {
    let rows = sqlx::query_as::<_, DbReminder>(
        r#"
        SELECT r.record_id, r.org_id, r.user_id, r.slot_id, r.service_id, r.worker_id,
               r.reviewed, r.created_at,
               u.email AS user_email, s.start_time AS slot_start, s.end_time AS slot_end
        FROM records r
        JOIN slots s ON s.slot_id = r.slot_id
        JOIN users u ON u.user_id = r.user_id
        WHERE r.reminded_at IS NULL
        AND s.start_time >= $1
        AND s.start_time < $2
        ORDER BY s.start_time ASC
        "#,
    )
    .bind(window.start)
    .bind(window.end)
    .fetch_all(pool)
    .await
    .wrap_err("failed to load upcoming records")?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn mark_reminded(
    pool: &Pool<Postgres>,
    record_ids: &[Uuid],
    at: DateTime<Utc>,
) -> TimelineResult<u64> {
    let result = sqlx::query("UPDATE records SET reminded_at = $2 WHERE record_id = ANY($1)")
        .bind(record_ids.to_vec())
        .bind(at)
        .execute(pool)
        .await
        .wrap_err("failed to mark records reminded")?;

    Ok(result.rows_affected())
}

/// Leaves feedback once the appointment is over. The record flips to
/// reviewed in the same transaction, so a second attempt conflicts.
pub async fn feedback_add(
    pool: &Pool<Postgres>,
    feedback: &Feedback,
    now: DateTime<Utc>,
) -> TimelineResult<Feedback> {
    let mut tx = pool.begin().await.wrap_err("failed to start tx")?;

    let slot_end = sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        SELECT s.end_time
        FROM records r
        JOIN slots s ON s.slot_id = r.slot_id
        WHERE r.record_id = $1
        "#,
    )
    .bind(feedback.record_id)
    .fetch_optional(&mut *tx)
    .await
    .wrap_err("failed to read appointment time")?
    .ok_or_else(|| record_not_found(feedback.record_id))?;

    if slot_end > now {
        return Err(TimelineError::Validation(
            "feedback is accepted only after the appointment".to_string(),
        ));
    }

    let reviewed = sqlx::query(
        "UPDATE records SET reviewed = TRUE WHERE record_id = $1 AND reviewed = FALSE",
    )
    .bind(feedback.record_id)
    .execute(&mut *tx)
    .await
    .wrap_err("failed to mark record reviewed")?;

    if reviewed.rows_affected() == 0 {
        return Err(TimelineError::Conflict(format!(
            "Record {} already has feedback",
            feedback.record_id
        )));
    }

    let row = sqlx::query_as::<_, DbFeedback>(
        r#"
        INSERT INTO feedback (record_id, rating, comment)
        VALUES ($1, $2, $3)
        RETURNING record_id, rating, comment
        "#,
    )
    .bind(feedback.record_id)
    .bind(i16::from(feedback.rating))
    .bind(&feedback.comment)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| db_error(e, "failed to save feedback"))?;

    tx.commit().await.wrap_err("failed to commit tx")?;
    Ok(row.into())
}

pub async fn feedback_by_record(
    pool: &Pool<Postgres>,
    record_id: Uuid,
) -> TimelineResult<Feedback> {
    let row = sqlx::query_as::<_, DbFeedback>(
        "SELECT record_id, rating, comment FROM feedback WHERE record_id = $1",
    )
    .bind(record_id)
    .fetch_optional(pool)
    .await
    .wrap_err("failed to get feedback")?;

    row.map(Into::into).ok_or_else(|| {
        TimelineError::NotFound(format!("Feedback for record {} not found", record_id))
    })
}
