use crate::{
    models::DbWorker,
    repositories::{db_error, service::service_by_id},
};
use eyre::WrapErr;
use sqlx::{Pool, Postgres};
use timeline_core::{
    errors::{TimelineError, TimelineResult},
    models::catalog::Worker,
};
use uuid::Uuid;

const WORKER_COLUMNS: &str =
    "worker_id, org_id, first_name, last_name, position, degree";

fn worker_not_found(worker_id: Uuid) -> TimelineError {
    TimelineError::NotFound(format!("Worker with ID {} not found", worker_id))
}

pub async fn worker_add(pool: &Pool<Postgres>, worker: &Worker) -> TimelineResult<Worker> {
    let row = sqlx::query_as::<_, DbWorker>(&format!(
        r#"
        INSERT INTO workers ({WORKER_COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {WORKER_COLUMNS}
        "#
    ))
    .bind(worker.worker_id)
    .bind(worker.org_id)
    .bind(&worker.first_name)
    .bind(&worker.last_name)
    .bind(&worker.position)
    .bind(&worker.degree)
    .fetch_one(pool)
    .await
    .map_err(|e| db_error(e, "failed to add worker"))?;

    Ok(row.into())
}

pub async fn worker_by_id(
    pool: &Pool<Postgres>,
    org_id: Uuid,
    worker_id: Uuid,
) -> TimelineResult<Worker> {
    let row = sqlx::query_as::<_, DbWorker>(&format!(
        "SELECT {WORKER_COLUMNS} FROM workers WHERE worker_id = $1 AND org_id = $2"
    ))
    .bind(worker_id)
    .bind(org_id)
    .fetch_optional(pool)
    .await
    .wrap_err("failed to get worker by id")?;

    row.map(Into::into).ok_or_else(|| worker_not_found(worker_id))
}

pub async fn worker_list(pool: &Pool<Postgres>, org_id: Uuid) -> TimelineResult<Vec<Worker>> {
    let rows = sqlx::query_as::<_, DbWorker>(&format!(
        r#"
        SELECT {WORKER_COLUMNS}
        FROM workers
        WHERE org_id = $1
        ORDER BY last_name ASC, first_name ASC
        "#
    ))
    .bind(org_id)
    .fetch_all(pool)
    .await
    .wrap_err("failed to list workers")?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Schedules, slots and the records on those slots cascade with the worker.
pub async fn worker_delete(
    pool: &Pool<Postgres>,
    org_id: Uuid,
    worker_id: Uuid,
) -> TimelineResult<()> {
    let result = sqlx::query("DELETE FROM workers WHERE worker_id = $1 AND org_id = $2")
        .bind(worker_id)
        .bind(org_id)
        .execute(pool)
        .await
        .wrap_err("failed to delete worker")?;

    if result.rows_affected() == 0 {
        return Err(worker_not_found(worker_id));
    }
    Ok(())
}

pub async fn worker_assign_service(
    pool: &Pool<Postgres>,
    org_id: Uuid,
    worker_id: Uuid,
    service_id: Uuid,
) -> TimelineResult<()> {
    worker_by_id(pool, org_id, worker_id).await?;
    service_by_id(pool, org_id, service_id).await?;

    sqlx::query(
        r#"
        INSERT INTO worker_services (worker_id, service_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(worker_id)
    .bind(service_id)
    .execute(pool)
    .await
    .map_err(|e| db_error(e, "failed to assign service"))?;

    Ok(())
}
