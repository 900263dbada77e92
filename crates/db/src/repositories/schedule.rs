use crate::{models::DbSchedule, repositories::db_error};
use eyre::WrapErr;
use sqlx::{Pool, Postgres};
use timeline_core::{
    errors::{TimelineError, TimelineResult},
    models::schedule::WorkerSchedule,
};
use uuid::Uuid;

const SCHEDULE_COLUMNS: &str =
    "schedule_id, worker_id, org_id, weekday, start_time, end_time, break_start, break_end";

pub async fn schedule_add(
    pool: &Pool<Postgres>,
    schedule: &WorkerSchedule,
) -> TimelineResult<WorkerSchedule> {
    tracing::debug!(
        "Adding schedule: id={}, worker={}, weekday={}",
        schedule.schedule_id,
        schedule.worker_id,
        schedule.weekday
    );

    let row = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        INSERT INTO worker_schedules ({SCHEDULE_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {SCHEDULE_COLUMNS}
        "#
    ))
    .bind(schedule.schedule_id)
    .bind(schedule.worker_id)
    .bind(schedule.org_id)
    .bind(i16::from(schedule.weekday))
    .bind(schedule.start)
    .bind(schedule.end)
    .bind(schedule.break_window.map(|b| b.start))
    .bind(schedule.break_window.map(|b| b.end))
    .fetch_one(pool)
    .await
    .map_err(|e| db_error(e, "failed to add schedule"))?;

    Ok(row.into())
}

pub async fn schedule_by_id(
    pool: &Pool<Postgres>,
    schedule_id: Uuid,
) -> TimelineResult<WorkerSchedule> {
    let row = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        SELECT {SCHEDULE_COLUMNS}
        FROM worker_schedules
        WHERE schedule_id = $1
        "#
    ))
    .bind(schedule_id)
    .fetch_optional(pool)
    .await
    .wrap_err("failed to get schedule by id")?;

    row.map(Into::into).ok_or_else(|| {
        TimelineError::NotFound(format!("Schedule with ID {} not found", schedule_id))
    })
}

pub async fn schedule_update(
    pool: &Pool<Postgres>,
    schedule: &WorkerSchedule,
) -> TimelineResult<WorkerSchedule> {
    let row = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        UPDATE worker_schedules
        SET weekday = $2, start_time = $3, end_time = $4, break_start = $5, break_end = $6
        WHERE schedule_id = $1
        RETURNING {SCHEDULE_COLUMNS}
        "#
    ))
    .bind(schedule.schedule_id)
    .bind(i16::from(schedule.weekday))
    .bind(schedule.start)
    .bind(schedule.end)
    .bind(schedule.break_window.map(|b| b.start))
    .bind(schedule.break_window.map(|b| b.end))
    .fetch_optional(pool)
    .await
    .map_err(|e| db_error(e, "failed to update schedule"))?;

    row.map(Into::into).ok_or_else(|| {
        TimelineError::NotFound(format!(
            "Schedule with ID {} not found",
            schedule.schedule_id
        ))
    })
}

pub async fn schedule_delete(pool: &Pool<Postgres>, schedule_id: Uuid) -> TimelineResult<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM worker_schedules
        WHERE schedule_id = $1
        "#,
    )
    .bind(schedule_id)
    .execute(pool)
    .await
    .wrap_err("failed to delete schedule")?;

    if result.rows_affected() == 0 {
        return Err(TimelineError::NotFound(format!(
            "Schedule with ID {} not found",
            schedule_id
        )));
    }
    Ok(())
}

pub async fn schedules(
    pool: &Pool<Postgres>,
    org_id: Uuid,
    worker_id: Option<Uuid>,
) -> TimelineResult<Vec<WorkerSchedule>> {
    let rows = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        SELECT {SCHEDULE_COLUMNS}
        FROM worker_schedules
        WHERE org_id = $1
        AND ($2::uuid IS NULL OR worker_id = $2)
        ORDER BY worker_id ASC, weekday ASC
        "#
    ))
    .bind(org_id)
    .bind(worker_id)
    .fetch_all(pool)
    .await
    .wrap_err("failed to list schedules")?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn all_schedules(pool: &Pool<Postgres>) -> TimelineResult<Vec<WorkerSchedule>> {
    let rows = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        SELECT {SCHEDULE_COLUMNS}
        FROM worker_schedules
        ORDER BY worker_id ASC, weekday ASC
        "#
    ))
    .fetch_all(pool)
    .await
    .wrap_err("failed to load schedules")?;

    Ok(rows.into_iter().map(Into::into).collect())
}
